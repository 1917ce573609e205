//! SMTP credentials

use std::{convert::Infallible, fmt};

/// A password that never shows up in logs
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Create a new password
    pub fn new(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// Get the password as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the password is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

/// SMTP login, parsed from `user:password`.
///
/// Input without a colon gives empty credentials; the server will then
/// refuse the login at send time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: Password,
}

impl Credentials {
    /// Parses `user:password`, trimming whitespace around both parts.
    ///
    /// Never fails; the signature fits `clap`'s `value_parser`.
    pub fn parse(raw: &str) -> Result<Self, Infallible> {
        Ok(Self::from(raw))
    }

    /// The user name
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The password
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Whether both user and password are empty
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.password.is_empty()
    }
}

impl From<&str> for Credentials {
    fn from(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((user, password)) => Self {
                user: user.trim().to_string(),
                password: Password::new(password.trim()),
            },
            None => Self::default(),
        }
    }
}
