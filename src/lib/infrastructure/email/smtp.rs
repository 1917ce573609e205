//! SMTP email service implementation

use std::{error::Error, sync::Arc};

use async_trait::async_trait;
use lettre::{
    address::Envelope,
    message::{
        header::{ContentType, Header, HeaderName, HeaderValue},
        Mailbox,
    },
    Address, Message,
};
use tracing::{debug, info, warn};

use crate::{
    domain::communication::{Email, EmailError, EmailFields, Mailer, SendContext},
    infrastructure::config::{EmailConfig, SMTPConfig},
};

mod connection;
mod credentials;

pub use connection::{converse, LettreConnector, SmtpConnector, SmtpSession};
pub use credentials::{Credentials, Password};

/// Tags a message sent through the SES SMTP interface with a configuration set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SesConfigurationSet(String);

impl Header for SesConfigurationSet {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-SES-CONFIGURATION-SET")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// SMTP mailer
///
/// Submits its email over STARTTLS with a login, one connection per send.
/// Works with any submission server, including SES with SMTP credentials.
#[derive(Debug)]
pub struct SMTPMailer<C = LettreConnector> {
    connector: Arc<C>,
    config: SMTPConfig,
    email: Email,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    ///
    /// Empty values in `settings` and `fields` are taken from `config`.
    pub fn new(settings: SMTPConfig, fields: EmailFields, config: &EmailConfig) -> Self {
        Self::with_connector(LettreConnector, settings, fields, config)
    }
}

impl<C: SmtpConnector> SMTPMailer<C> {
    /// Create a new SMTP mailer that opens connections through `connector`
    pub fn with_connector(
        connector: C,
        settings: SMTPConfig,
        fields: EmailFields,
        config: &EmailConfig,
    ) -> Self {
        let resolved = settings.resolve(&config.smtp);
        let email = Email::new(fields, &config.message.fields());

        debug!(
            host = %resolved.host,
            port = resolved.port,
            user = %resolved.credentials.user(),
            "SMTP mailer ready"
        );

        Self {
            connector: Arc::new(connector),
            config: resolved,
            email,
        }
    }

    /// The resolved SMTP settings
    pub fn config(&self) -> &SMTPConfig {
        &self.config
    }

    async fn deliver(&self) -> Result<(), EmailError> {
        let (envelope, message) = compose(&self.email)?;

        let connector = Arc::clone(&self.connector);
        let host = self.config.host.clone();
        let port = self.config.port;
        let credentials = self.config.credentials.clone();

        tokio::task::spawn_blocking(move || {
            converse(
                connector.as_ref(),
                &host,
                port,
                &credentials,
                &envelope,
                &message,
            )
        })
        .await
        .map_err(|e| EmailError::new(e.to_string()))??;

        Ok(())
    }
}

#[async_trait]
impl<C: SmtpConnector> Mailer for SMTPMailer<C> {
    async fn send(&self) -> Result<(), EmailError> {
        match self.deliver().await {
            Ok(()) => {
                info!(recipients = ?self.email.recipients(), "Email sent.");
                Ok(())
            }
            Err(err) => {
                let context = SendContext::new(&self.email, self.config.credentials.user());

                warn!(
                    error = %err,
                    user = %context.user,
                    sender = %context.sender,
                    sender_name = %context.sender_name,
                    subject = %context.subject,
                    recipients = ?context.recipients,
                    "SMTP send failed"
                );

                Err(err.with_context(context))
            }
        }
    }

    fn email(&self) -> &Email {
        &self.email
    }
}

/// Builds the SMTP envelope and the formatted message for `email`.
///
/// Fails before any connection is made when there are no recipients or an
/// address does not parse.
pub fn compose(email: &Email) -> Result<(Envelope, Vec<u8>), EmailError> {
    if email.recipients().is_empty() {
        return Err(EmailError::new("no recipients"));
    }

    let sender: Address = email.sender().parse()?;
    let recipients = email
        .recipients()
        .iter()
        .map(|recipient| recipient.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;

    let sender_name = Some(email.sender_name().to_string()).filter(|name| !name.is_empty());

    let mut builder = Message::builder()
        .from(Mailbox::new(sender_name, sender.clone()))
        .subject(email.subject())
        .header(ContentType::TEXT_PLAIN);

    for recipient in &recipients {
        builder = builder.to(Mailbox::new(None, recipient.clone()));
    }

    if let Some(configuration_set) = email.configuration_set() {
        builder = builder.header(SesConfigurationSet(configuration_set.to_string()));
    }

    let message = builder.body(email.body_text().to_string())?;
    let envelope = Envelope::new(Some(sender), recipients)?;

    Ok((envelope, message.formatted()))
}
