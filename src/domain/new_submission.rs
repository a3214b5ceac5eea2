use crate::domain::{ContactEmail, ContactMessage, ContactName, ContactPhone};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub phone: Option<ContactPhone>,
    pub message: ContactMessage,
}

impl NewSubmission {
    /// Any blank required field is reported with the same message before the
    /// individual fields get a chance to complain about their format.
    pub fn parse(
        name: String,
        email: String,
        phone: Option<String>,
        message: String,
    ) -> Result<NewSubmission, String> {
        if [&name, &email, &message].iter().any(|f| f.trim().is_empty()) {
            return Err(ALL_FIELDS_REQUIRED.to_string());
        }
        Ok(Self {
            name: ContactName::parse(name)?,
            email: ContactEmail::parse(email)?,
            phone: ContactPhone::parse(phone)?,
            message: ContactMessage::parse(message)?,
        })
    }
}
