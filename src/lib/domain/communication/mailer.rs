//! Mailer module

use async_trait::async_trait;

use crate::domain::communication::errors::EmailError;

pub mod message;

use message::Email;

/// A transport that owns one [`Email`] and knows how to deliver it.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Sends the owned email.
    ///
    /// # Returns
    /// [`Ok`] once the remote side has accepted the message, or an
    /// [`EmailError`] describing why it did not.
    async fn send(&self) -> Result<(), EmailError>;

    /// The email this transport delivers
    fn email(&self) -> &Email;
}
