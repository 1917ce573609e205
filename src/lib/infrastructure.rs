//! Infrastructure layer

pub mod config;
pub mod email;
