//! Test utilities for finparse-core
//!
//! Provides a mock chat-completions server so provider clients can be
//! exercised over real HTTP without any hosted API. Enabled via the
//! `test-utils` feature.

use std::net::SocketAddr;

use axum::{extract::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Canned behavior for the mock provider server
#[derive(Clone, Debug)]
pub enum MockServerMode {
    /// Answer every request with this completion text
    Respond(String),
    /// Answer with HTTP 500
    Fail,
}

/// Mock OpenAI-compatible server for provider tests
pub struct MockProviderServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockServerMode) -> Self {
        let app = Router::new().route(
            "/chat/completions",
            post(move |req: Json<CompletionRequest>| handle_completions(req, mode.clone())),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for pointing an `OpenAiChatProvider` at this server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Deserialize)]
struct CompletionRequest {
    model: String,
    #[allow(dead_code)]
    messages: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    model: String,
}

#[derive(Serialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Serialize)]
struct ChoiceMessage {
    role: String,
    content: String,
}

async fn handle_completions(
    Json(request): Json<CompletionRequest>,
    mode: MockServerMode,
) -> Result<Json<CompletionResponse>, axum::http::StatusCode> {
    match mode {
        MockServerMode::Respond(content) => Ok(Json(CompletionResponse {
            choices: vec![Choice {
                message: ChoiceMessage {
                    role: "assistant".to_string(),
                    content,
                },
            }],
            model: request.model,
        })),
        MockServerMode::Fail => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
