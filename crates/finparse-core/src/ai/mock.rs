//! Mock provider for testing
//!
//! Returns a canned response, malformed text, an error, or hangs past
//! the orchestrator's timeout, so fallback behavior can be exercised
//! without network access.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::Provider;

/// What the mock should do when asked to complete
#[derive(Clone, Debug)]
pub enum MockMode {
    /// Return this text verbatim
    Respond(String),
    /// Return text with no JSON object in it
    Malformed,
    /// Fail immediately
    Fail,
    /// Sleep this long before responding, to trigger timeouts
    Slow(Duration),
}

#[derive(Clone)]
pub struct MockProvider {
    name: String,
    mode: MockMode,
}

impl MockProvider {
    pub fn new(name: &str, mode: MockMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
        }
    }

    /// A mock that answers with a well-formed extraction payload
    pub fn json(name: &str, payload: &str) -> Self {
        Self::new(name, MockMode::Respond(payload.to_string()))
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        match &self.mode {
            MockMode::Respond(text) => Ok(text.clone()),
            MockMode::Malformed => Ok("I could not find a transaction here.".to_string()),
            MockMode::Fail => Err(Error::Provider(format!("{} unavailable", self.name))),
            MockMode::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("{}".to_string())
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
