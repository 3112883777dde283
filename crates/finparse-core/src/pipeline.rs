//! Multi-channel processing pipeline
//!
//! One coordinator routes every input channel: SMS and email text, voice
//! audio, OCR receipt text, and statement pages. Extraction itself is
//! stateless; the only mutable state is the recent-activity window used
//! for duplicate flagging, which is owned by the pipeline and touched
//! from one place.
//!
//! Voice is the layered channel: speech-to-text, then intent confidence
//! gates the response three ways. Below 0.4 the caller gets a
//! clarification request, between 0.4 and 0.6 a usage hint, and at 0.6
//! or above the transcript runs through the full extraction chain.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::ai::{ExtractionOutcome, ExtractionSource, Orchestrator};
use crate::error::{Error, Result};
use crate::extract::{EmailParser, ReceiptParser, StatementParser};
use crate::intent::{Entities, IntentDetector, KeywordIntentDetector};
use crate::models::{Channel, ReceiptDraft, TransactionDraft};
use crate::recent::RecentWindow;
use crate::taxonomy::Taxonomy;

const CLARIFICATION_CEILING: f64 = 0.4;
const EXTRACTION_FLOOR: f64 = 0.6;

const CLARIFICATION_REPLY: &str =
    "I'm not sure… did you want to check balance or record a transaction?";

/// Speech-to-text collaborator. A transcript containing "unavailable" or
/// "failed" is treated as a terminal failure for the request.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Post-extraction annotation collaborator. Runs strictly after category
/// normalization; failures downgrade to no insight rather than failing
/// the request.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn insight(&self, draft: &TransactionDraft) -> Result<String>;
}

/// A fully-processed single transaction
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTransaction {
    #[serde(flatten)]
    pub draft: TransactionDraft,
    pub provider_used: String,
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// Outcome of the voice channel's three-way confidence gate
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoiceResponse {
    /// Confidence below 0.4: ask the user to rephrase
    ClarificationNeeded { transcript: String, reply: String },
    /// Confidence in [0.4, 0.6): echo intent and a usage hint
    Hint {
        transcript: String,
        intent: String,
        entities: Entities,
        reply: String,
    },
    /// Confidence at or above 0.6: full extraction ran
    Transaction {
        transcript: String,
        intent: String,
        entities: Entities,
        confidence: f64,
        #[serde(flatten)]
        result: ProcessedTransaction,
    },
}

pub struct Pipeline {
    orchestrator: Orchestrator,
    email: EmailParser,
    receipt: ReceiptParser,
    statement: StatementParser,
    intent: Box<dyn IntentDetector>,
    speech: Option<Box<dyn SpeechToText>>,
    insights: Option<Box<dyn InsightGenerator>>,
    recent: Mutex<RecentWindow>,
}

impl Pipeline {
    pub fn new(orchestrator: Orchestrator, taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            orchestrator,
            email: EmailParser::new(taxonomy.clone()),
            receipt: ReceiptParser::new(taxonomy.clone()),
            statement: StatementParser::new(taxonomy),
            intent: Box::new(KeywordIntentDetector::new()),
            speech: None,
            insights: None,
            recent: Mutex::new(RecentWindow::new()),
        }
    }

    /// Environment-configured pipeline with the standard taxonomy
    pub fn from_env() -> Self {
        let taxonomy = Arc::new(Taxonomy::standard());
        Self::new(Orchestrator::from_env(taxonomy.clone()), taxonomy)
    }

    pub fn with_intent_detector(mut self, detector: Box<dyn IntentDetector>) -> Self {
        self.intent = detector;
        self
    }

    pub fn with_speech_to_text(mut self, speech: Box<dyn SpeechToText>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_insight_generator(mut self, insights: Box<dyn InsightGenerator>) -> Self {
        self.insights = Some(insights);
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.orchestrator.provider_names()
    }

    /// SMS channel: provider chain with rule-based fallback
    pub async fn process_sms(&self, text: &str) -> ProcessedTransaction {
        info!("Starting SMS processing");
        let outcome = self.orchestrator.analyze(text, Channel::Sms).await;
        self.finish(outcome).await
    }

    /// Voice channel: decode, transcribe, gate on intent confidence
    pub async fn process_voice(&self, audio_base64: &str) -> Result<VoiceResponse> {
        info!("Starting voice processing");

        let audio = base64::engine::general_purpose::STANDARD
            .decode(audio_base64)
            .map_err(|e| Error::Audio(format!("audio payload is not valid base64: {e}")))?;

        let speech = self
            .speech
            .as_ref()
            .ok_or_else(|| Error::Transcription("no speech-to-text backend configured".into()))?;

        let transcript = speech.transcribe(&audio).await?;
        let transcript = transcript.trim().to_string();

        let lowered = transcript.to_lowercase();
        if transcript.is_empty() || lowered.contains("unavailable") || lowered.contains("failed") {
            return Err(Error::Transcription(
                "speech could not be transcribed".into(),
            ));
        }

        info!(%transcript, "Transcription complete");
        self.process_transcript(&transcript).await
    }

    /// The post-transcription half of the voice channel, also used when
    /// the caller already has text
    pub async fn process_transcript(&self, transcript: &str) -> Result<VoiceResponse> {
        let result = self.intent.detect(transcript).await?;
        info!(
            intent = %result.intent,
            confidence = result.confidence,
            "Intent detected"
        );

        if result.confidence < CLARIFICATION_CEILING {
            return Ok(VoiceResponse::ClarificationNeeded {
                transcript: transcript.to_string(),
                reply: CLARIFICATION_REPLY.to_string(),
            });
        }

        if result.confidence < EXTRACTION_FLOOR {
            return Ok(VoiceResponse::Hint {
                transcript: transcript.to_string(),
                intent: result.intent,
                entities: result.entities,
                reply: self.intent.fallback_hint(transcript),
            });
        }

        let outcome = self.orchestrator.analyze(transcript, Channel::Voice).await;
        let processed = self.finish(outcome).await;

        Ok(VoiceResponse::Transaction {
            transcript: transcript.to_string(),
            intent: result.intent,
            entities: result.entities,
            confidence: result.confidence,
            result: processed,
        })
    }

    /// Email channel: rule-based only, bank alerts are well-formed
    pub async fn process_email(&self, text: &str) -> ProcessedTransaction {
        info!("Starting email processing");
        let outcome = ExtractionOutcome {
            draft: self.email.parse(text),
            source: ExtractionSource::RuleBased,
        };
        self.finish(outcome).await
    }

    /// Receipt channel: OCR text to draft plus line items
    pub async fn process_receipt(&self, ocr_text: &str) -> (ReceiptDraft, Option<String>) {
        info!("Starting receipt processing");
        let receipt = self.receipt.parse(ocr_text);
        let insight = self.annotate(&receipt.draft).await;
        (receipt, insight)
    }

    /// Statement channel: every dated line on the page
    pub fn process_statement(&self, text: &str) -> Vec<TransactionDraft> {
        info!("Starting statement processing");
        self.statement.parse(text)
    }

    /// Duplicate-flag and annotate a finished extraction
    async fn finish(&self, outcome: ExtractionOutcome) -> ProcessedTransaction {
        let duplicate = self
            .recent
            .lock()
            .await
            .check_and_record(outcome.draft.amount, &outcome.draft.counterparty);
        if duplicate {
            warn!(
                amount = outcome.draft.amount,
                counterparty = %outcome.draft.counterparty,
                "Possible duplicate transaction"
            );
        }

        let insight = self.annotate(&outcome.draft).await;

        ProcessedTransaction {
            draft: outcome.draft,
            provider_used: outcome.source.label().to_string(),
            duplicate,
            insight,
        }
    }

    async fn annotate(&self, draft: &TransactionDraft) -> Option<String> {
        let generator = self.insights.as_ref()?;
        match generator.insight(draft).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Insight generation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::intent::IntentResult;
    use crate::models::TxnType;

    fn pipeline() -> Pipeline {
        let taxonomy = Arc::new(Taxonomy::standard());
        Pipeline::new(Orchestrator::new(vec![], taxonomy.clone()), taxonomy)
    }

    /// Intent stub with a fixed confidence
    struct FixedConfidence(f64);

    #[async_trait]
    impl IntentDetector for FixedConfidence {
        async fn detect(&self, _text: &str) -> Result<IntentResult> {
            Ok(IntentResult {
                intent: "transaction_add".to_string(),
                confidence: self.0,
                entities: Entities::default(),
            })
        }

        fn fallback_hint(&self, _text: &str) -> String {
            "hint".to_string()
        }
    }

    struct FixedTranscript(&'static str);

    #[async_trait]
    impl SpeechToText for FixedTranscript {
        async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn gated(confidence: f64) -> Pipeline {
        pipeline().with_intent_detector(Box::new(FixedConfidence(confidence)))
    }

    #[tokio::test]
    async fn test_confidence_just_below_low_gate_asks_for_clarification() {
        let response = gated(0.39)
            .process_transcript("spent 200 on snacks")
            .await
            .unwrap();
        assert!(matches!(response, VoiceResponse::ClarificationNeeded { .. }));
    }

    #[tokio::test]
    async fn test_confidence_at_low_gate_returns_hint() {
        let response = gated(0.4)
            .process_transcript("spent 200 on snacks")
            .await
            .unwrap();
        assert!(matches!(response, VoiceResponse::Hint { .. }));
    }

    #[tokio::test]
    async fn test_confidence_at_high_gate_extracts() {
        let response = gated(0.6)
            .process_transcript("Paid Rs. 500 to Swiggy for dinner")
            .await
            .unwrap();
        match response {
            VoiceResponse::Transaction { result, .. } => {
                assert_eq!(result.draft.amount, 500.0);
                assert_eq!(result.draft.counterparty, "Swiggy");
                assert_eq!(result.draft.source_channel, Channel::Voice);
                assert_eq!(result.provider_used, "rule_based");
            }
            other => panic!("expected transaction, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_audio_is_an_error() {
        let p = gated(0.9).with_speech_to_text(Box::new(FixedTranscript("hello")));
        let err = p.process_voice("not base64!!!").await.unwrap_err();
        assert!(matches!(err, Error::Audio(_)));
    }

    #[tokio::test]
    async fn test_stt_sentinel_is_terminal() {
        let p = gated(0.9)
            .with_speech_to_text(Box::new(FixedTranscript("transcription unavailable")));
        let audio = base64::engine::general_purpose::STANDARD.encode(b"audio bytes");
        let err = p.process_voice(&audio).await.unwrap_err();
        assert!(matches!(err, Error::Transcription(_)));
    }

    #[tokio::test]
    async fn test_valid_audio_runs_the_gate() {
        let p = gated(0.9)
            .with_speech_to_text(Box::new(FixedTranscript("Paid Rs. 500 to Swiggy for dinner")));
        let audio = base64::engine::general_purpose::STANDARD.encode(b"audio bytes");
        let response = p.process_voice(&audio).await.unwrap();
        assert!(matches!(response, VoiceResponse::Transaction { .. }));
    }

    #[tokio::test]
    async fn test_sms_duplicate_flagged_on_second_pass() {
        let p = pipeline();
        let first = p.process_sms("Paid Rs. 500 to Swiggy for dinner").await;
        assert!(!first.duplicate);
        let second = p.process_sms("Paid Rs. 500 to Swiggy for dinner").await;
        assert!(second.duplicate);
    }

    #[tokio::test]
    async fn test_email_channel_tags_and_extracts() {
        let p = pipeline();
        let result = p
            .process_email("INR 2,499.00 was charged by Amazon on 12 March 2024")
            .await;
        assert_eq!(result.draft.source_channel, Channel::Email);
        assert_eq!(result.draft.amount, 2499.0);
        assert_eq!(result.provider_used, "rule_based");
    }

    #[tokio::test]
    async fn test_receipt_channel() {
        let p = pipeline();
        let (receipt, insight) = p
            .process_receipt("DMart Super Store\nRice 2 x 80.00\nGrand Total: 160.00")
            .await;
        assert_eq!(receipt.draft.txn_type, TxnType::Debited);
        assert_eq!(receipt.draft.amount, 160.0);
        assert_eq!(receipt.items.len(), 1);
        assert!(insight.is_none());
    }

    #[tokio::test]
    async fn test_statement_channel() {
        let p = pipeline();
        let drafts = p.process_statement("12/01/2024  UPI-SWIGGY  450.00  DR");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].source_channel, Channel::PdfStatement);
    }

    struct FixedInsight;

    #[async_trait]
    impl InsightGenerator for FixedInsight {
        async fn insight(&self, draft: &TransactionDraft) -> Result<String> {
            Ok(format!("You spent {} at {}", draft.amount, draft.counterparty))
        }
    }

    #[tokio::test]
    async fn test_insight_runs_after_extraction() {
        let p = pipeline().with_insight_generator(Box::new(FixedInsight));
        let result = p.process_sms("Paid Rs. 500 to Swiggy for dinner").await;
        assert_eq!(result.insight.as_deref(), Some("You spent 500 at Swiggy"));
    }
}
