//! The SMTP conversation, one step at a time

use std::time::Duration;

use anyhow::Result;
use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::{self, Mechanism},
        client::{SmtpConnection, TlsParameters},
        commands::Ehlo,
        extension::ClientId,
    },
};

#[cfg(test)]
use mockall::automock;

use super::Credentials;

const TIMEOUT: Duration = Duration::from_secs(60);

const MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// An open SMTP connection
#[cfg_attr(test, automock)]
pub trait SmtpSession: Send {
    /// Announce ourselves and read the server's capabilities
    fn ehlo(&mut self) -> Result<()>;

    /// Upgrade the connection to TLS
    fn starttls(&mut self) -> Result<()>;

    /// Authenticate
    fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Submit one message for the envelope's recipients
    fn submit(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()>;

    /// Close the connection
    fn quit(&mut self) -> Result<()>;
}

/// Opens SMTP connections
#[cfg_attr(test, automock)]
pub trait SmtpConnector: Send + Sync + 'static {
    /// Connect to `host:port` and read the greeting
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn SmtpSession>>;
}

/// Opens plain TCP connections with lettre, ready for STARTTLS
#[derive(Debug, Default, Clone, Copy)]
pub struct LettreConnector;

impl SmtpConnector for LettreConnector {
    fn connect(&self, host: &str, port: u16) -> Result<Box<dyn SmtpSession>> {
        let hello = ClientId::default();
        let connection = SmtpConnection::connect((host, port), Some(TIMEOUT), &hello, None, None)?;

        Ok(Box::new(LettreSession {
            connection,
            host: host.to_string(),
            hello,
        }))
    }
}

/// A lettre connection.
///
/// lettre's `connect()` and `starttls()` already send EHLO themselves, so
/// `ehlo()` here is a plain re-announcement through `command`.
struct LettreSession {
    connection: SmtpConnection,
    host: String,
    hello: ClientId,
}

impl SmtpSession for LettreSession {
    fn ehlo(&mut self) -> Result<()> {
        self.connection.command(Ehlo::new(self.hello.clone()))?;
        Ok(())
    }

    fn starttls(&mut self) -> Result<()> {
        let parameters = TlsParameters::new(self.host.clone())?;
        self.connection.starttls(&parameters, &self.hello)?;
        Ok(())
    }

    fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let credentials = authentication::Credentials::new(
            credentials.user().to_string(),
            credentials.password().as_str().to_string(),
        );
        self.connection.auth(MECHANISMS, &credentials)?;
        Ok(())
    }

    fn submit(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()> {
        self.connection.send(envelope, message)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.connection.quit()?;
        Ok(())
    }
}

/// Runs one full submission: EHLO, STARTTLS, EHLO again, login, submit, QUIT.
///
/// The second EHLO is needed because servers may announce different
/// capabilities (notably AUTH) once TLS is up. QUIT is attempted whether or
/// not an earlier step failed.
pub fn converse<C>(
    connector: &C,
    host: &str,
    port: u16,
    credentials: &Credentials,
    envelope: &Envelope,
    message: &[u8],
) -> Result<()>
where
    C: SmtpConnector + ?Sized,
{
    let mut session = connector.connect(host, port)?;

    let result = submit(session.as_mut(), credentials, envelope, message);

    match result {
        Ok(()) => session.quit(),
        Err(err) => {
            if let Err(quit_err) = session.quit() {
                tracing::debug!(error = %quit_err, "QUIT after failed submission also failed");
            }
            Err(err)
        }
    }
}

fn submit(
    session: &mut dyn SmtpSession,
    credentials: &Credentials,
    envelope: &Envelope,
    message: &[u8],
) -> Result<()> {
    session.ehlo()?;
    session.starttls()?;
    session.ehlo()?;
    session.login(credentials)?;
    session.submit(envelope, message)
}
