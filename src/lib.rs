#![deny(clippy::disallowed_methods)]

pub mod bootstrap;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fs;
pub mod metadata;
pub mod update;

use anyhow::Result;
use clap::Parser as _;
use cmd::{Command as _, IntoCommand as _};
use shadow_rs::shadow;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

shadow!(build);

pub async fn run() -> Result<()> {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Args::parse();

    args.command.into_command().run().await
}
