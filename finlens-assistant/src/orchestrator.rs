//! Ask the remote assistant first, answer locally when it cannot.
//!
//! [`QueryOrchestrator::answer`] has no error path. Whatever goes wrong with
//! the collaborator is recorded as a [`FallbackReason`] and the intent
//! resolver answers instead.

use finlens_core::{Transaction, TransactionSummary};
use serde::Serialize;
use std::fmt;

use crate::client::{AiError, CompletionClient, CompletionRequest};
use crate::intents::{IntentResolver, Resolution};

/// Why the local resolver answered
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured(String),
    Transport(String),
    Status(u16),
    /// Response arrived but carried no usable answer
    MissingAnswer,
    Malformed(String),
}

impl From<AiError> for FallbackReason {
    fn from(e: AiError) -> Self {
        match e {
            AiError::NotConfigured(m) => FallbackReason::NotConfigured(m),
            AiError::Transport(m) => FallbackReason::Transport(m),
            AiError::Status { status, .. } => FallbackReason::Status(status),
            AiError::Malformed(m) => FallbackReason::Malformed(m),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured(m) => write!(f, "not configured ({m})"),
            FallbackReason::Transport(m) => write!(f, "transport failure ({m})"),
            FallbackReason::Status(s) => write!(f, "status {s}"),
            FallbackReason::MissingAnswer => write!(f, "no answer in response"),
            FallbackReason::Malformed(m) => write!(f, "malformed response ({m})"),
        }
    }
}

/// Exactly one of the two paths produced the answer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Answer {
    Ai { text: String },
    Fallback {
        resolution: Resolution,
        reason: FallbackReason,
    },
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Ai { text } => text,
            Answer::Fallback { resolution, .. } => &resolution.answer,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Ai { text } => text,
            Answer::Fallback { resolution, .. } => resolution.answer,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Answer::Fallback { .. })
    }
}

#[derive(Debug)]
pub struct QueryOrchestrator {
    resolver: IntentResolver,
}

impl QueryOrchestrator {
    pub fn new(resolver: IntentResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    pub async fn answer<C>(&self, question: &str, transactions: &[Transaction], client: &C) -> Answer
    where
        C: CompletionClient + ?Sized,
    {
        let request = CompletionRequest {
            question: question.to_string(),
            summary: TransactionSummary::from_transactions(transactions),
        };

        let reason = match client.complete(&request).await {
            Ok(resp) => match resp.answer.filter(|a| !a.trim().is_empty()) {
                Some(text) if resp.success => {
                    tracing::info!("answered by AI collaborator");
                    return Answer::Ai { text };
                }
                _ => FallbackReason::MissingAnswer,
            },
            Err(e) => FallbackReason::from(e),
        };

        tracing::warn!(%reason, "AI collaborator unavailable, answering locally");
        Answer::Fallback {
            resolution: self.resolver.resolve(question, transactions),
            reason,
        }
    }
}
