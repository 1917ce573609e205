#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Compose a plain-text email and send it over SMTP or through the Amazon SES API

pub mod domain;
pub mod infrastructure;
