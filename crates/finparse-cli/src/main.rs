//! Finparse CLI - Multi-channel transaction extraction
//!
//! Usage:
//!   finparse sms "Paid Rs. 500 to Swiggy for dinner"
//!   finparse voice "add expense 120 for food"
//!   finparse email --file alert.txt
//!   finparse receipt --file receipt.txt
//!   finparse statement --file page.txt
//!   finparse providers

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Sms { text } => commands::cmd_sms(&text).await,
        Commands::Voice {
            transcript,
            confidence,
        } => commands::cmd_voice(&transcript, confidence).await,
        Commands::Email { text, file } => {
            commands::cmd_email(text.as_deref(), file.as_deref()).await
        }
        Commands::Receipt { file } => commands::cmd_receipt(&file).await,
        Commands::Statement { file } => commands::cmd_statement(&file),
        Commands::Providers => commands::cmd_providers(),
    }
}
