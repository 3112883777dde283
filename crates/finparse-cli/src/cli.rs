//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finparse - Extract structured transactions from financial text
#[derive(Parser)]
#[command(name = "finparse")]
#[command(about = "Multi-channel financial text extraction pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a bank SMS through the provider chain
    Sms {
        /// The SMS text
        text: String,
    },

    /// Run a voice transcript through the confidence gate
    Voice {
        /// The transcript text
        transcript: String,

        /// Override the detected intent confidence (0.0 to 1.0)
        #[arg(short, long)]
        confidence: Option<f64>,
    },

    /// Parse a bank email alert
    Email {
        /// The email body text; omit to read from --file
        text: Option<String>,

        /// Read the email body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Parse OCR text from a receipt
    Receipt {
        /// File containing the OCR text
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Parse a bank statement page
    Statement {
        /// File containing the statement text
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List configured AI providers in preference order
    Providers,
}
