//! Amazon SES email service implementation

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    domain::communication::{Email, EmailError, EmailFields, Mailer, SendContext},
    infrastructure::config::EmailConfig,
};

mod client;
mod request;

pub use client::{SesClient, SesClientError, SesV2Client};
pub use request::{SendEmailRequest, CHARSET};

/// SES mailer
///
/// Sends its email through the SES `SendEmail` API using the ambient AWS
/// credentials. No SMTP credentials needed.
#[derive(Debug)]
pub struct SesMailer<C = SesV2Client> {
    client: C,
    email: Email,
}

impl SesMailer {
    /// Create a new SES mailer for `region`
    ///
    /// An empty `region` and empty `fields` are taken from `config`.
    pub async fn new(region: &str, fields: EmailFields, config: &EmailConfig) -> Self {
        let region = region_or_default(region, config);
        let client = SesV2Client::new(region, config.ses.max_attempts).await;

        debug!(
            region,
            max_attempts = config.ses.max_attempts,
            "SES client ready"
        );

        Self::with_client(client, fields, config)
    }
}

impl<C: SesClient> SesMailer<C> {
    /// Create a new SES mailer that sends through `client`
    pub fn with_client(client: C, fields: EmailFields, config: &EmailConfig) -> Self {
        Self {
            client,
            email: Email::new(fields, &config.message.fields()),
        }
    }

    /// The request this mailer sends
    pub fn request(&self) -> SendEmailRequest {
        SendEmailRequest::from(&self.email)
    }

    async fn deliver(&self) -> Result<String, EmailError> {
        if self.email.recipients().is_empty() {
            return Err(EmailError::new("no recipients"));
        }

        Ok(self.client.send_email(&self.request()).await?)
    }
}

#[async_trait]
impl<C: SesClient> Mailer for SesMailer<C> {
    async fn send(&self) -> Result<(), EmailError> {
        match self.deliver().await {
            Ok(message_id) => {
                info!(%message_id, "Email sent.");
                Ok(())
            }
            Err(err) => {
                let context = SendContext::new(&self.email, "");

                warn!(
                    error = %err,
                    sender = %context.sender,
                    sender_name = %context.sender_name,
                    subject = %context.subject,
                    recipients = ?context.recipients,
                    "SES send failed"
                );

                Err(err.with_context(context))
            }
        }
    }

    fn email(&self) -> &Email {
        &self.email
    }
}

fn region_or_default<'a>(region: &'a str, config: &'a EmailConfig) -> &'a str {
    if region.is_empty() {
        &config.ses.region
    } else {
        region
    }
}
