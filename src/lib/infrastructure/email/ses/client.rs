//! SES v2 client

use anyhow::anyhow;
use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_sesv2::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    types::{Body, Content, Destination, EmailContent, Message},
    Client,
};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::domain::communication::EmailError;

use super::request::{self, SendEmailRequest};

/// Errors reported by an SES client
#[derive(Debug, Error)]
pub enum SesClientError {
    /// SES understood the request and refused it
    #[error("{message}")]
    Service {
        /// The provider's error code, e.g. `MessageRejected`
        code: Option<String>,

        /// The provider's error message
        message: String,
    },

    /// Anything else: network, credentials, request construction
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SesClientError> for EmailError {
    fn from(err: SesClientError) -> Self {
        EmailError::new(err.to_string())
    }
}

/// Sends a prepared request to SES
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SesClient: Send + Sync + 'static {
    /// Send the request and return the message id SES assigned
    async fn send_email(&self, request: &SendEmailRequest) -> Result<String, SesClientError>;
}

/// SES client backed by `aws_sdk_sesv2`.
///
/// Requests are signed with SigV4 and transient failures are retried by the
/// SDK in standard mode.
#[derive(Debug, Clone)]
pub struct SesV2Client {
    client: Client,
}

impl SesV2Client {
    /// Create a client for `region` that makes at most `max_attempts` attempts per call
    pub async fn new(region: &str, max_attempts: u32) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::standard().with_max_attempts(max_attempts))
            .load()
            .await;

        Self::from_client(Client::new(&config))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SesClient for SesV2Client {
    async fn send_email(&self, request: &SendEmailRequest) -> Result<String, SesClientError> {
        let destination = Destination::builder()
            .set_to_addresses(Some(request.destination.to_addresses.clone()))
            .build();

        let message = Message::builder()
            .subject(content(&request.message.subject)?)
            .body(Body::builder().text(content(&request.message.body.text)?).build())
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&request.source)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .set_configuration_set_name(request.configuration_set_name.clone())
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(service) if service.message().is_some() => SesClientError::Service {
                    code: service.code().map(String::from),
                    message: service.message().unwrap_or_default().to_string(),
                },
                _ => SesClientError::Other(anyhow!("{}", DisplayErrorContext(&err))),
            })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

fn content(part: &request::Content) -> Result<Content, SesClientError> {
    Content::builder()
        .data(&part.data)
        .charset(&part.charset)
        .build()
        .map_err(|e| SesClientError::Other(e.into()))
}
