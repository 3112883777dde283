//! Channel commands: parse one input and print the draft as JSON

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use finparse_core::intent::{IntentDetector, IntentResult, KeywordIntentDetector};
use finparse_core::{Channel, Orchestrator, Pipeline};

/// Intent detector that keeps keyword intent and entities but reports a
/// caller-chosen confidence, for exercising the gate from the CLI
struct ConfidenceOverride {
    inner: KeywordIntentDetector,
    confidence: f64,
}

#[async_trait]
impl IntentDetector for ConfidenceOverride {
    async fn detect(&self, text: &str) -> finparse_core::Result<IntentResult> {
        let mut result = self.inner.detect(text).await?;
        result.confidence = self.confidence;
        Ok(result)
    }

    fn fallback_hint(&self, text: &str) -> String {
        self.inner.fallback_hint(text)
    }
}

pub async fn cmd_sms(text: &str) -> Result<()> {
    let pipeline = Pipeline::from_env();
    let result = pipeline.process_sms(text).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn cmd_voice(transcript: &str, confidence: Option<f64>) -> Result<()> {
    let mut pipeline = Pipeline::from_env();
    if let Some(confidence) = confidence {
        if !(0.0..=1.0).contains(&confidence) {
            bail!("--confidence must be between 0.0 and 1.0");
        }
        pipeline = pipeline.with_intent_detector(Box::new(ConfidenceOverride {
            inner: KeywordIntentDetector::new(),
            confidence,
        }));
    }

    // A failure anywhere in the voice chain still yields a structured
    // draft, tagged as an error
    match pipeline.process_transcript(transcript).await {
        Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
        Err(e) => {
            let outcome = Orchestrator::error_outcome(transcript, Channel::Voice, &e);
            eprintln!("voice pipeline failed: {e}");
            println!("{}", serde_json::to_string_pretty(&outcome.draft)?);
        }
    }
    Ok(())
}

pub async fn cmd_email(text: Option<&str>, file: Option<&Path>) -> Result<()> {
    let body = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide the email body as an argument or via --file"),
    };

    let pipeline = Pipeline::from_env();
    let result = pipeline.process_email(&body).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn cmd_receipt(file: &Path) -> Result<()> {
    let ocr_text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let pipeline = Pipeline::from_env();
    let (receipt, _insight) = pipeline.process_receipt(&ocr_text).await;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

pub fn cmd_statement(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let pipeline = Pipeline::from_env();
    let drafts = pipeline.process_statement(&text);
    println!("{}", serde_json::to_string_pretty(&drafts)?);
    eprintln!("{} transaction(s) extracted", drafts.len());
    Ok(())
}
