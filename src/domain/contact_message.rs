use crate::domain::ALL_FIELDS_REQUIRED;

const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Clone)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn parse(s: String) -> Result<ContactMessage, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ALL_FIELDS_REQUIRED.to_string());
        }
        if s.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(format!(
                "Message must be at most {} characters long.",
                MAX_MESSAGE_LENGTH
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
