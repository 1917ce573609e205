//! Error types for the email module

use lettre::{address::AddressError, error::Error};
use thiserror::Error;

use super::mailer::message::Email;

/// What was being sent when a transport gave up.
///
/// Attached to an [`EmailError`] at the transport boundary so callers can log
/// it in one place. Credentials never go in here beyond the user name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendContext {
    /// The user the transport authenticated as, if any
    pub user: String,

    /// The envelope sender
    pub sender: String,

    /// The sender's display name
    pub sender_name: String,

    /// The message subject
    pub subject: String,

    /// The envelope recipients
    pub recipients: Vec<String>,
}

impl SendContext {
    /// Captures the context of sending `email` as `user`
    pub fn new(email: &Email, user: &str) -> Self {
        Self {
            user: user.to_string(),
            sender: email.sender().to_string(),
            sender_name: email.sender_name().to_string(),
            subject: email.subject().to_string(),
            recipients: email.recipients().to_vec(),
        }
    }
}

/// Email error
///
/// The only error a caller sees from a send. It displays as the underlying
/// failure's description and nothing else.
#[derive(Debug, Error)]
#[error("{description}")]
pub struct EmailError {
    description: String,
    context: Option<SendContext>,
}

impl EmailError {
    /// Creates an error with the given description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: None,
        }
    }

    /// Attaches the send context
    pub fn with_context(mut self, context: SendContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The human-readable description of the failure
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The send context, if the failure happened inside a transport
    pub fn context(&self) -> Option<&SendContext> {
        self.context.as_ref()
    }
}

impl From<anyhow::Error> for EmailError {
    fn from(err: anyhow::Error) -> Self {
        EmailError::new(err.to_string())
    }
}

impl From<AddressError> for EmailError {
    fn from(err: AddressError) -> Self {
        EmailError::new(err.to_string())
    }
}

impl From<Error> for EmailError {
    fn from(err: Error) -> Self {
        EmailError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::domain::communication::{EmailFields, Recipients};

    use super::*;

    #[test]
    fn test_display_is_the_description() {
        let err = EmailError::new("Email address not verified");

        assert_eq!(err.to_string(), "Email address not verified");
        assert_eq!(err.description(), "Email address not verified");
        assert!(err.context().is_none());
    }

    #[test]
    fn test_from_anyhow_keeps_the_message() {
        let err: EmailError = anyhow!("connection refused").into();

        assert_eq!(err.description(), "connection refused");
    }

    #[test]
    fn test_from_address_error() {
        let err: EmailError = "not an address"
            .parse::<lettre::Address>()
            .unwrap_err()
            .into();

        assert!(!err.description().is_empty());
    }

    #[test]
    fn test_context_is_captured_from_email() {
        let email = Email::new(
            EmailFields {
                sender: "a@x.com".to_string(),
                sender_name: "Alice".to_string(),
                recipients: Recipients::from(vec!["b@y.com", "c@y.com"]),
                subject: "Hi".to_string(),
                ..Default::default()
            },
            &EmailFields::default(),
        );

        let err = EmailError::new("boom").with_context(SendContext::new(&email, "smtp-user"));

        assert_eq!(
            err.context(),
            Some(&SendContext {
                user: "smtp-user".to_string(),
                sender: "a@x.com".to_string(),
                sender_name: "Alice".to_string(),
                subject: "Hi".to_string(),
                recipients: vec!["b@y.com".to_string(), "c@y.com".to_string()],
            })
        );
        assert_eq!(err.to_string(), "boom");
    }
}
