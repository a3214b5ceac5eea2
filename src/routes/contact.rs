use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use std::fmt::Formatter;

use crate::domain::{NewSubmission, ALL_FIELDS_REQUIRED};
use crate::notification::NotificationDispatcher;
use crate::routes::error_chain_fmt;
use crate::store::{Submission, SubmissionStore};

/// Every key is optional so that a missing field goes through the same
/// validation path as a blank one.
#[derive(serde::Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    message: Option<String>,
}

impl TryFrom<ContactForm> for NewSubmission {
    type Error = String;

    fn try_from(value: ContactForm) -> Result<Self, Self::Error> {
        NewSubmission::parse(
            value.name.unwrap_or_default(),
            value.email.unwrap_or_default(),
            value.phone,
            value.message.unwrap_or_default(),
        )
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Server error occurred.")]
    PersistenceError(#[source] anyhow::Error),
    #[error("Email failed to send.")]
    NotificationError(#[source] anyhow::Error),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::PersistenceError(_) | ContactError::NotificationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ContactResponse::failure(&self.to_string()))
    }
}

/// Body for JSON payloads that cannot be deserialized at all.
pub fn malformed_payload_response() -> HttpResponse {
    HttpResponse::BadRequest().json(ContactResponse::failure(ALL_FIELDS_REQUIRED))
}

#[tracing::instrument(
    name = "Handling a contact form submission",
    skip(form, store, dispatcher),
    fields(
        contact_email = tracing::field::Empty,
        contact_name = tracing::field::Empty
    )
)]
pub async fn submit_contact(
    form: web::Json<ContactForm>,
    store: web::Data<dyn SubmissionStore>,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<HttpResponse, ContactError> {
    let new_submission: NewSubmission = form.0.try_into().map_err(|e: String| {
        tracing::warn!(reason = %e, "Rejected an invalid submission");
        ContactError::ValidationError(e)
    })?;
    tracing::Span::current()
        .record("contact_email", &tracing::field::display(&new_submission.email))
        .record("contact_name", &tracing::field::display(&new_submission.name));

    let submission = Submission::from(&new_submission);
    store.insert(&submission).await.map_err(|e| {
        tracing::error!(error.cause_chain = ?e, "Failed to persist the submission");
        ContactError::PersistenceError(e)
    })?;

    dispatcher.notify(&new_submission).await.map_err(|e| {
        tracing::error!(
            error.cause_chain = ?e,
            submission_id = %submission.id,
            "Failed to send the notification email, the submission is kept"
        );
        ContactError::NotificationError(e)
    })?;

    Ok(HttpResponse::Ok().json(ContactResponse::success("Message sent successfully!")))
}
