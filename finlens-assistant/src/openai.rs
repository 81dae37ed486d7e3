//! OpenAI-compatible chat completions collaborator.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::{AiError, CompletionClient, CompletionRequest, CompletionResponse};

pub const SYSTEM_PROMPT: &str = "You are an expert financial advisor and AI assistant. You help users with:
- Personal finance management
- Budgeting and expense tracking
- Investment advice
- Financial planning
- Money management tips
- Analysis of spending patterns

Always provide practical, actionable advice. Be encouraging and supportive while being honest about financial realities.";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub model: String,
    /// `None` makes every call fail with [`AiError::NotConfigured`]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 400,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct Msg {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Req {
    model: String,
    messages: Vec<Msg>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Debug, Deserialize)]
struct MsgOut {
    content: Option<String>,
}

pub fn user_prompt(request: &CompletionRequest) -> String {
    format!(
        "User Question: \"{}\"\n\n{}\n\nPlease provide a helpful, personalized response based on the user's question and financial data. Keep your response conversational, practical, and under 200 words.",
        request.question,
        request.summary.render()
    )
}

pub struct OpenAiClient {
    settings: OpenAiSettings,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { settings, http })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn body(&self, request: &CompletionRequest) -> Req {
        Req {
            model: self.settings.model.clone(),
            messages: vec![
                Msg {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Msg {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

fn first_answer(resp: Resp) -> Option<String> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AiError> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::NotConfigured("missing OpenAI API key".to_string()))?;

        let resp = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {key}"))
            .json(&self.body(request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let out: Resp = resp.json().await?;
        let answer = first_answer(out);
        Ok(CompletionResponse {
            success: answer.is_some(),
            answer,
        })
    }
}
