use anyhow::Context;

use crate::configuration::{EmailSettings, ProviderSettings};
use crate::domain::{ContactEmail, NewSubmission};
use crate::email_client::EmailClient;
use crate::smtp_client::SmtpClient;

/// A composed notification, independent of how it is delivered.
#[derive(Debug, Clone)]
pub struct Email {
    pub reply_to: ContactEmail,
    pub reply_to_name: String,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
}

impl Email {
    pub fn for_submission(submission: &NewSubmission) -> Self {
        let name = submission.name.as_ref();
        let email = submission.email.as_ref();
        let phone: Option<&str> = submission.phone.as_ref().map(|p| p.as_ref());
        let message = submission.message.as_ref();

        let mut html_content = format!(
            "<h2>New Contact Message</h2>\
            <p><strong>Name:</strong> {}</p>\
            <p><strong>Email:</strong> {}</p>",
            htmlescape::encode_minimal(name),
            htmlescape::encode_minimal(email),
        );
        let mut text_content = format!("New Contact Message\n\nName: {}\nEmail: {}\n", name, email);
        if let Some(phone) = phone {
            html_content.push_str(&format!(
                "<p><strong>Phone:</strong> {}</p>",
                htmlescape::encode_minimal(phone)
            ));
            text_content.push_str(&format!("Phone: {}\n", phone));
        }
        html_content.push_str(&format!(
            "<p><strong>Message:</strong></p><p>{}</p>",
            htmlescape::encode_minimal(message).replace('\n', "<br>")
        ));
        text_content.push_str(&format!("Message:\n{}\n", message));

        Self {
            reply_to: submission.email.clone(),
            reply_to_name: name.to_owned(),
            subject: format!("New contact form message from {}", name),
            html_content,
            text_content,
        }
    }
}

pub enum Provider {
    Api(EmailClient),
    Smtp(SmtpClient),
}

impl Provider {
    fn kind(&self) -> &'static str {
        match self {
            Provider::Api(_) => "api",
            Provider::Smtp(_) => "smtp",
        }
    }
}

/// Sends one alert per submission to a fixed recipient.
/// A single attempt is made; failures are returned, never retried.
pub struct NotificationDispatcher {
    provider: Provider,
    recipient: ContactEmail,
}

impl NotificationDispatcher {
    pub fn new(provider: Provider, recipient: ContactEmail) -> Self {
        Self {
            provider,
            recipient,
        }
    }

    pub fn from_settings(settings: &EmailSettings) -> Result<Self, anyhow::Error> {
        let sender = settings
            .sender()
            .map_err(anyhow::Error::msg)
            .context("Invalid sender email address in configuration")?;
        let recipient = settings
            .recipient()
            .map_err(anyhow::Error::msg)
            .context("Invalid recipient email address in configuration")?;
        let provider = match &settings.provider {
            ProviderSettings::Api { base_url, api_key } => Provider::Api(EmailClient::new(
                base_url.clone(),
                sender,
                settings.sender_name.clone(),
                api_key.clone(),
                settings.timeout(),
            )?),
            ProviderSettings::Smtp {
                host,
                port,
                username,
                password,
            } => Provider::Smtp(SmtpClient::new(
                host,
                *port,
                username.clone(),
                password.clone(),
                &sender,
                settings.sender_name.clone(),
                settings.timeout(),
            )?),
        };
        Ok(Self::new(provider, recipient))
    }

    #[tracing::instrument(
        name = "Dispatching contact notification",
        skip(self, submission),
        fields(provider = %self.provider.kind())
    )]
    pub async fn notify(&self, submission: &NewSubmission) -> Result<(), anyhow::Error> {
        let email = Email::for_submission(submission);
        match &self.provider {
            Provider::Api(client) => client.send_email(&self.recipient, &email).await,
            Provider::Smtp(client) => client.send_email(&self.recipient, &email).await,
        }
    }
}
