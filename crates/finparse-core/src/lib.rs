//! Finparse Core Library
//!
//! Shared functionality for the finparse transaction extraction tool:
//! - Regex field extractors (amount, type, counterparty, date)
//! - Channel parsers for SMS, voice, email, receipts, and statements
//! - Keyword category taxonomy with amount-tier fallback
//! - Preference-ordered AI provider chain with rule-based fallback
//! - Intent detection for voice transcripts
//! - Multi-channel pipeline coordinator

pub mod ai;
pub mod error;
pub mod extract;
pub mod intent;
pub mod models;
pub mod pipeline;
pub mod recent;
pub mod taxonomy;

/// Test utilities including a mock provider server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    build_extraction_prompt, CohereProvider, ExtractionOutcome, ExtractionSource, GeminiProvider,
    MockMode, MockProvider, OpenAiChatProvider, Orchestrator, Provider, ProviderClient,
};
pub use error::{Error, Result};
pub use extract::{
    AmountExtractor, CounterpartyExtractor, DateExtractor, DateMatch, EmailParser, ReceiptParser,
    SmsParser, StatementParser, TypeDetector, VoiceParser,
};
pub use intent::{Entities, IntentDetector, IntentResult, KeywordIntentDetector};
pub use models::{
    Channel, Extracted, ReceiptDraft, ReceiptItem, TransactionDraft, TxnType,
};
pub use pipeline::{
    InsightGenerator, Pipeline, ProcessedTransaction, SpeechToText, VoiceResponse,
};
pub use recent::RecentWindow;
pub use taxonomy::Taxonomy;
