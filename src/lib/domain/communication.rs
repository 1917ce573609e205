//! Outbound email: the message model, the sending seam and its error type

pub mod errors;
pub mod mailer;

pub use errors::{EmailError, SendContext};
pub use mailer::{
    message::{Email, EmailFields, Recipients},
    Mailer,
};
