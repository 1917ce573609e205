//! The SES `SendEmail` payload

use serde::Serialize;

use crate::domain::communication::Email;

/// Character set of every text part
pub const CHARSET: &str = "UTF-8";

/// A `SendEmail` request, shaped like the SES wire format.
///
/// `ConfigurationSetName` is left out entirely when there is no
/// configuration set; its presence alone switches on tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailRequest {
    /// Who receives the email
    pub destination: Destination,

    /// Subject and body
    pub message: MessageContent,

    /// `Name <address>` or the bare sender address
    pub source: String,

    /// Configuration set to tag the send with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_set_name: Option<String>,
}

/// Recipients of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Destination {
    /// `To` addresses
    pub to_addresses: Vec<String>,
}

/// Subject and body of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageContent {
    /// The subject line
    pub subject: Content,

    /// The body
    pub body: Body,
}

/// Body of a request; plain text only
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Body {
    /// The plain text part
    pub text: Content,
}

/// A piece of text with its character set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    /// Character set of `data`
    pub charset: String,

    /// The text
    pub data: String,
}

impl Content {
    fn utf8(data: &str) -> Self {
        Self {
            charset: CHARSET.to_string(),
            data: data.to_string(),
        }
    }
}

impl From<&Email> for SendEmailRequest {
    fn from(email: &Email) -> Self {
        Self {
            destination: Destination {
                to_addresses: email.recipients().to_vec(),
            },
            message: MessageContent {
                subject: Content::utf8(email.subject()),
                body: Body {
                    text: Content::utf8(email.body_text()),
                },
            },
            source: email.source(),
            configuration_set_name: email.configuration_set().map(String::from),
        }
    }
}
