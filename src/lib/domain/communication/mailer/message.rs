//! Email message

/// One or more envelope recipients.
///
/// Built from either a single address or an ordered list of addresses; a
/// single address becomes a one-element list. Empty strings are dropped, so
/// an empty string yields no recipients at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Whether there are no recipients
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The addresses, in the order given
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::from(address.to_string())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        if address.is_empty() {
            Self::default()
        } else {
            Self(vec![address])
        }
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses.into_iter().filter(|a| !a.is_empty()).collect())
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Self::from(addresses.as_slice())
    }
}

impl From<&[&str]> for Recipients {
    fn from(addresses: &[&str]) -> Self {
        Self::from(addresses.iter().map(|a| a.to_string()).collect::<Vec<_>>())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self::from(addresses.as_slice())
    }
}

/// The caller-supplied parts of an email.
///
/// Any field left empty is filled from the configured defaults when the
/// [`Email`] is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailFields {
    /// The sender address
    pub sender: String,

    /// The sender's display name
    pub sender_name: String,

    /// The recipients
    pub recipients: Recipients,

    /// Provider-side tag for tracking the send
    pub configuration_set: String,

    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub body_text: String,
}

/// Email message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    sender: String,
    sender_name: String,
    recipients: Vec<String>,
    configuration_set: String,
    subject: String,
    body_text: String,
}

impl Email {
    /// Builds an email from `fields`, taking each empty field from `defaults`.
    pub fn new(fields: EmailFields, defaults: &EmailFields) -> Self {
        let recipients = if fields.recipients.is_empty() {
            defaults.recipients.clone()
        } else {
            fields.recipients
        };

        Self {
            sender: or_default(fields.sender, &defaults.sender),
            sender_name: or_default(fields.sender_name, &defaults.sender_name),
            recipients: recipients.0,
            configuration_set: or_default(fields.configuration_set, &defaults.configuration_set),
            subject: or_default(fields.subject, &defaults.subject),
            body_text: or_default(fields.body_text, &defaults.body_text),
        }
    }

    /// The sender address
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// The sender's display name, empty when there is none
    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// The recipients, in order
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// The configuration set, if one was given
    pub fn configuration_set(&self) -> Option<&str> {
        Some(self.configuration_set.as_str()).filter(|set| !set.is_empty())
    }

    /// The subject of the email
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body of the email
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// The sender formatted for a `From`/`Source` field: `Name <address>` when
    /// there is a display name, otherwise the bare address.
    pub fn source(&self) -> String {
        if self.sender_name.is_empty() {
            self.sender.clone()
        } else {
            format!("{} <{}>", self.sender_name, self.sender)
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
