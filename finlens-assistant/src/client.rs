//! The remote completion collaborator, seen only through a trait.

use async_trait::async_trait;
use finlens_core::TransactionSummary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Question plus aggregate context. Raw records are never sent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub question: String,
    pub summary: TransactionSummary,
}

/// What the collaborator hands back
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CompletionResponse {
    pub success: bool,
    pub answer: Option<String>,
}

impl CompletionResponse {
    pub fn answered(answer: impl Into<String>) -> Self {
        Self {
            success: true,
            answer: Some(answer.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service not configured: {0}")]
    NotConfigured(String),
    #[error("AI request failed: {0}")]
    Transport(String),
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI response could not be read: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AiError::Malformed(e.to_string())
        } else {
            AiError::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AiError>;
}

/// Collaborator used when no remote service is configured; every call fails.
#[derive(Debug, Clone, Default)]
pub struct OfflineClient;

#[async_trait]
impl CompletionClient for OfflineClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, AiError> {
        Err(AiError::NotConfigured("offline mode".to_string()))
    }
}
