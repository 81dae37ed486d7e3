//! finlens-assistant: answers finance questions, remotely when the AI
//! collaborator is reachable and from a local rule table when it is not.

pub mod client;
pub mod intents;
pub mod openai;
pub mod orchestrator;

pub use client::{AiError, CompletionClient, CompletionRequest, CompletionResponse, OfflineClient};
pub use intents::{Intent, IntentResolver, Resolution};
pub use openai::{OpenAiClient, OpenAiSettings};
pub use orchestrator::{Answer, FallbackReason, QueryOrchestrator};
