#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Send one email over SMTP or through Amazon SES

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ses_mailer::{
    domain::communication::{EmailFields, Mailer},
    infrastructure::{
        config::{EmailConfig, SMTPConfig},
        email::{ses::SesMailer, smtp::SMTPMailer},
    },
};
use tracing_subscriber::EnvFilter;

/// How to deliver the email
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Direct SMTP submission with STARTTLS
    Smtp,

    /// The SES `SendEmail` API
    Ses,
}

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(name = "send-mail")]
pub struct Args {
    /// The transport to send with
    #[arg(long, value_enum, env = "EMAIL_TRANSPORT", default_value = "ses")]
    transport: Transport,

    /// Message defaults and transport settings
    #[clap(flatten)]
    pub config: EmailConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mailer: Box<dyn Mailer> = match args.transport {
        Transport::Smtp => Box::new(SMTPMailer::new(
            SMTPConfig::default(),
            EmailFields::default(),
            &args.config,
        )),
        Transport::Ses => {
            Box::new(SesMailer::new("", EmailFields::default(), &args.config).await)
        }
    };

    mailer.send().await?;

    Ok(())
}
