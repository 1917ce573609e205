//! Email transports
//!
//! Both transports own one [`Email`](crate::domain::communication::Email) and
//! implement [`Mailer`](crate::domain::communication::Mailer):
//!
//! - [`smtp::SMTPMailer`] submits over STARTTLS with a login
//! - [`ses::SesMailer`] calls the Amazon SES v2 `SendEmail` API

pub mod ses;
pub mod smtp;
