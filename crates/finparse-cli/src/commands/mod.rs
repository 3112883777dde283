//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `channels` - One command per input channel (sms, voice, email, receipt, statement)
//! - `providers` - Provider chain inspection

pub mod channels;
pub mod providers;

// Re-export command functions for main.rs
pub use channels::*;
pub use providers::*;
