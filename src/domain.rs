pub mod contact_email;
pub mod contact_message;
pub mod contact_phone;
pub mod new_submission;

pub use contact_email::ContactEmail;
pub use contact_message::ContactMessage;
pub use contact_phone::ContactPhone;
pub use new_submission::{NewSubmission, ALL_FIELDS_REQUIRED};

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct ContactName(String);

impl ContactName {
    /// Trims the input and rejects empty or over-long names.
    pub fn parse(s: String) -> Result<ContactName, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ALL_FIELDS_REQUIRED.to_string());
        }
        // Graphemes, so that "å" counts as one character.
        if s.graphemes(true).count() > 256 {
            return Err("Name must be at most 256 characters long.".to_string());
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
