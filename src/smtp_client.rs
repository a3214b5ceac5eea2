use anyhow::Context;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret};

use crate::domain::ContactEmail;
use crate::notification::Email;

pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpClient {
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: Secret<String>,
        sender: &ContactEmail,
        sender_name: String,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let credentials = Credentials::new(username, password.expose_secret().to_owned());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("Failed to set up the SMTP relay {}", host))?
            .port(port)
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();
        let from = mailbox(Some(sender_name), sender)?;
        Ok(Self { transport, from })
    }

    #[tracing::instrument(name = "Sending email through the SMTP relay", skip(self, email))]
    pub async fn send_email(
        &self,
        recipient: &ContactEmail,
        email: &Email,
    ) -> Result<(), anyhow::Error> {
        let message = build_message(self.from.clone(), recipient, email)?;
        let response = self
            .transport
            .send(message)
            .await
            .context("The SMTP relay did not accept the message")?;
        tracing::debug!(smtp.code = %response.code(), "SMTP relay accepted the message");
        Ok(())
    }
}

fn mailbox(name: Option<String>, email: &ContactEmail) -> Result<Mailbox, anyhow::Error> {
    let address = email
        .as_ref()
        .parse()
        .with_context(|| format!("{} is not a deliverable address", email))?;
    Ok(Mailbox::new(name, address))
}

fn build_message(
    from: Mailbox,
    recipient: &ContactEmail,
    email: &Email,
) -> Result<Message, anyhow::Error> {
    Message::builder()
        .from(from)
        .reply_to(mailbox(Some(email.reply_to_name.clone()), &email.reply_to)?)
        .to(mailbox(None, recipient)?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text_content.clone(),
            email.html_content.clone(),
        ))
        .context("Failed to build the email message")
}
