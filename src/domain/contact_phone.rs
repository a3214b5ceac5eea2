const MAX_PHONE_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ContactPhone(String);

impl ContactPhone {
    /// A blank phone is not an error, it just means the field was left out.
    pub fn parse(s: Option<String>) -> Result<Option<ContactPhone>, String> {
        let s = match s.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) => s,
        };
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ' | '.');
        if s.chars().count() > MAX_PHONE_LENGTH || !s.chars().all(allowed) {
            return Err(format!("{} is not a valid phone number.", s));
        }
        Ok(Some(Self(s.to_string())))
    }
}

impl AsRef<str> for ContactPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
