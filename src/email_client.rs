use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::domain::ContactEmail;
use crate::notification::Email;

/// Client for a Brevo-style transactional email HTTP API.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: ContactEmail,
    sender_name: String,
    api_key: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: ContactEmail,
        sender_name: String,
        api_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the email HTTP client")?;
        Ok(Self {
            http_client,
            base_url,
            sender,
            sender_name,
            api_key,
        })
    }

    #[tracing::instrument(name = "Sending email through the HTTP API", skip(self, email))]
    pub async fn send_email(
        &self,
        recipient: &ContactEmail,
        email: &Email,
    ) -> Result<(), anyhow::Error> {
        let url = format!("{}/v3/smtp/email", self.base_url.trim_end_matches('/'));
        let request_body = SendEmailRequest {
            sender: Address {
                name: Some(self.sender_name.as_str()),
                email: self.sender.as_ref(),
            },
            to: vec![Address {
                name: None,
                email: recipient.as_ref(),
            }],
            reply_to: Address {
                name: Some(email.reply_to_name.as_str()),
                email: email.reply_to.as_ref(),
            },
            subject: email.subject.as_str(),
            html_content: email.html_content.as_str(),
            text_content: email.text_content.as_str(),
        };
        let response = self
            .http_client
            .post(&url)
            .header("api-key", self.api_key.expose_secret())
            .header("accept", "application/json")
            .json(&request_body)
            .send()
            .await
            .context("Failed to reach the email provider")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                provider.status = %status,
                provider.response = %body,
                "The email provider rejected the request"
            );
            anyhow::bail!("The email provider answered with status {}", status);
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Address<'a>,
    to: Vec<Address<'a>>,
    reply_to: Address<'a>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(serde::Serialize)]
struct Address<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}
