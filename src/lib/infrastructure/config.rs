//! Configuration for mailers, read once from the environment

use clap::Parser;

use crate::{
    domain::communication::{EmailFields, Recipients},
    infrastructure::email::smtp::Credentials,
};

/// Everything a mailer needs when the caller leaves a value empty
#[derive(Clone, Debug, Default, Parser)]
pub struct EmailConfig {
    /// Message defaults
    #[clap(flatten)]
    pub message: MessageDefaults,

    /// SMTP transport settings
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// SES transport settings
    #[clap(flatten)]
    pub ses: SesConfig,
}

impl EmailConfig {
    /// Loads `.env` if present, then reads the configuration from environment variables.
    pub fn from_env() -> Result<Self, clap::Error> {
        dotenvy::dotenv().ok();

        Self::try_parse_from(["ses-mailer"])
    }
}

/// Message defaults
#[derive(Clone, Debug, Default, Parser)]
pub struct MessageDefaults {
    /// The sender email address
    #[clap(long, env = "EMAIL_SENDER", default_value_t)]
    pub sender: String,

    /// The sender's display name
    #[clap(long, env = "EMAIL_SENDER_NAME", default_value_t)]
    pub sender_name: String,

    /// Comma separated recipient addresses
    #[clap(long, env = "EMAIL_RECIPIENTS", value_delimiter = ',')]
    pub recipients: Vec<String>,

    /// SES configuration set to tag sends with
    #[clap(long, env = "EMAIL_CONFIGURATION_SET", default_value_t)]
    pub configuration_set: String,

    /// The subject of the email
    #[clap(long, env = "EMAIL_SUBJECT", default_value_t)]
    pub subject: String,

    /// The plain text body of the email
    #[clap(long, env = "EMAIL_BODY_TEXT", default_value_t)]
    pub body_text: String,
}

impl MessageDefaults {
    /// The defaults as message fields
    pub fn fields(&self) -> EmailFields {
        EmailFields {
            sender: self.sender.clone(),
            sender_name: self.sender_name.clone(),
            recipients: Recipients::from(self.recipients.clone()),
            configuration_set: self.configuration_set.clone(),
            subject: self.subject.clone(),
            body_text: self.body_text.clone(),
        }
    }
}

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value_t = 587)]
    pub port: u16,

    /// The SMTP credentials as `user:password`
    #[clap(
        long = "smtp-credentials",
        env = "SMTP_CREDENTIALS",
        default_value = "",
        hide_env_values = true,
        value_parser = Credentials::parse
    )]
    pub credentials: Credentials,
}

impl SMTPConfig {
    /// Fills every empty setting from `fallback`.
    pub fn resolve(self, fallback: &SMTPConfig) -> SMTPConfig {
        SMTPConfig {
            host: if self.host.is_empty() {
                fallback.host.clone()
            } else {
                self.host
            },
            port: if self.port == 0 {
                fallback.port
            } else {
                self.port
            },
            credentials: if self.credentials.is_empty() {
                fallback.credentials.clone()
            } else {
                self.credentials
            },
        }
    }
}

/// SES configuration
#[derive(Clone, Debug, Parser)]
pub struct SesConfig {
    /// The AWS region the SES client talks to
    #[clap(long = "ses-region", env = "SES_REGION", default_value = "eu-central-1")]
    pub region: String,

    /// Attempts the SES client makes before giving up on a transient error
    #[clap(long = "ses-max-attempts", env = "SES_MAX_ATTEMPTS", default_value_t = 10)]
    pub max_attempts: u32,
}

impl Default for SesConfig {
    fn default() -> Self {
        Self {
            region: "eu-central-1".to_string(),
            max_attempts: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    fn default_of(id: &str) -> Option<String> {
        EmailConfig::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_default_values().first())
            .map(|value| value.to_string_lossy().into_owned())
    }

    #[test]
    fn test_unset_settings_fall_back_to_defaults() {
        assert_eq!(default_of("host").as_deref(), Some("localhost"));
        assert_eq!(default_of("port").as_deref(), Some("587"));
        assert_eq!(default_of("credentials").as_deref(), Some(""));
        assert_eq!(default_of("region").as_deref(), Some("eu-central-1"));
        assert_eq!(default_of("max_attempts").as_deref(), Some("10"));
        assert_eq!(default_of("recipients"), None);
    }

    #[test]
    fn test_trailing_comma_in_recipients() -> TestResult {
        let defaults = MessageDefaults::try_parse_from(["ses-mailer", "--recipients", "a@x.com,"])?;

        assert_eq!(
            defaults.fields().recipients,
            Recipients::from("a@x.com")
        );

        Ok(())
    }

    #[test]
    fn test_parse_flags() -> TestResult {
        let config = EmailConfig::try_parse_from([
            "ses-mailer",
            "--sender",
            "a@x.com",
            "--recipients",
            "b@y.com,c@y.com",
            "--smtp-host",
            "email-smtp.eu-central-1.amazonaws.com",
            "--smtp-credentials",
            "user1 : pass1",
            "--ses-region",
            "us-east-1",
        ])?;

        assert_eq!(config.message.sender, "a@x.com");
        assert_eq!(config.message.recipients, vec!["b@y.com", "c@y.com"]);
        assert_eq!(config.smtp.host, "email-smtp.eu-central-1.amazonaws.com");
        assert_eq!(config.smtp.credentials.user(), "user1");
        assert_eq!(config.smtp.credentials.password().as_str(), "pass1");
        assert_eq!(config.ses.region, "us-east-1");

        Ok(())
    }

    #[test]
    fn test_message_defaults_as_fields() {
        let defaults = MessageDefaults {
            sender: "a@x.com".to_string(),
            recipients: vec!["b@y.com".to_string()],
            subject: "Hi".to_string(),
            ..Default::default()
        };

        let fields = defaults.fields();

        assert_eq!(fields.sender, "a@x.com");
        assert_eq!(fields.recipients, Recipients::from("b@y.com"));
        assert_eq!(fields.subject, "Hi");
        assert!(fields.sender_name.is_empty());
    }

    #[test]
    fn test_smtp_resolve_keeps_given_values() {
        let fallback = SMTPConfig {
            host: "fallback.example.com".to_string(),
            port: 587,
            credentials: Credentials::from("user:pass"),
        };

        let resolved = SMTPConfig {
            host: "smtp.example.com".to_string(),
            port: 2587,
            credentials: Credentials::from("other:secret"),
        }
        .resolve(&fallback);

        assert_eq!(resolved.host, "smtp.example.com");
        assert_eq!(resolved.port, 2587);
        assert_eq!(resolved.credentials.user(), "other");
    }

    #[test]
    fn test_smtp_resolve_fills_empty_values() {
        let fallback = SMTPConfig {
            host: "fallback.example.com".to_string(),
            port: 587,
            credentials: Credentials::from("user:pass"),
        };

        let resolved = SMTPConfig::default().resolve(&fallback);

        assert_eq!(resolved.host, "fallback.example.com");
        assert_eq!(resolved.port, 587);
        assert_eq!(resolved.credentials.user(), "user");
    }

    #[test]
    fn test_ses_defaults() {
        let config = SesConfig::default();

        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.max_attempts, 10);
    }
}
