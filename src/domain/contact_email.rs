use validator::validate_email;

use crate::domain::ALL_FIELDS_REQUIRED;

#[derive(Debug, Clone)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: String) -> Result<ContactEmail, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ALL_FIELDS_REQUIRED.to_string());
        }
        if validate_email(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
