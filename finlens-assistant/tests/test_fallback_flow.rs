use async_trait::async_trait;
use finlens_assistant::intents::GREETING_TEXT;
use finlens_assistant::{
    AiError, Answer, CompletionClient, CompletionRequest, CompletionResponse, FallbackReason, Intent,
    IntentResolver, OfflineClient, QueryOrchestrator,
};
use finlens_core::Transaction;
use finlens_ingest::load_transactions;
use std::path::PathBuf;
use std::sync::Mutex;

fn fixture() -> Vec<Transaction> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join("transactions.json");
    load_transactions(path).unwrap()
}

fn orchestrator() -> QueryOrchestrator {
    QueryOrchestrator::new(IntentResolver::new().unwrap())
}

enum Behaviour {
    Network,
    Status(u16),
    Reply(CompletionResponse),
}

struct ScriptedClient {
    behaviour: Behaviour,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.behaviour {
            Behaviour::Network => Err(AiError::Transport("connection reset by peer".to_string())),
            Behaviour::Status(s) => Err(AiError::Status {
                status: *s,
                body: "{\"error\":\"quota\"}".to_string(),
            }),
            Behaviour::Reply(r) => Ok(r.clone()),
        }
    }
}

#[tokio::test]
async fn test_ai_answer_used_when_available() {
    let client = ScriptedClient::new(Behaviour::Reply(CompletionResponse::answered(
        "Your food spending looks healthy.",
    )));
    let txns = fixture();
    let answer = orchestrator().answer("How is my food spending?", &txns, &client).await;

    assert_eq!(answer, Answer::Ai { text: "Your food spending looks healthy.".to_string() });
    assert!(!answer.is_fallback());

    // Context is the summary, not raw records
    let seen = client.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].summary.transaction_count, 9);
    assert_eq!(seen[0].summary.total_income, 102000.0);
    assert_eq!(seen[0].summary.categories, vec!["food", "transport", "salary", "utilities"]);
}

#[tokio::test]
async fn test_network_error_falls_back() {
    let client = ScriptedClient::new(Behaviour::Network);
    let answer = orchestrator().answer("hello", &fixture(), &client).await;

    match &answer {
        Answer::Fallback { resolution, reason } => {
            assert_eq!(resolution.intent, Intent::Greeting);
            assert!(matches!(reason, FallbackReason::Transport(_)));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(answer.text(), GREETING_TEXT);
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let client = ScriptedClient::new(Behaviour::Status(500));
    let answer = orchestrator().answer("what's my balance", &fixture(), &client).await;
    match answer {
        Answer::Fallback { resolution, reason } => {
            assert_eq!(reason, FallbackReason::Status(500));
            assert_eq!(
                resolution.answer,
                "Your current balance is ₹83,230. Total income: ₹102,000, Total expenses: ₹18,770."
            );
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_or_blank_answer_falls_back() {
    for resp in [
        CompletionResponse { success: true, answer: None },
        CompletionResponse { success: true, answer: Some("   ".to_string()) },
        CompletionResponse { success: false, answer: Some("partial".to_string()) },
    ] {
        let client = ScriptedClient::new(Behaviour::Reply(resp));
        let answer = orchestrator().answer("tell me a joke", &fixture(), &client).await;
        match answer {
            Answer::Fallback { resolution, reason } => {
                assert_eq!(reason, FallbackReason::MissingAnswer);
                assert_eq!(resolution.intent, Intent::Default);
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_offline_client_always_answers() {
    let answer = orchestrator()
        .answer("total expense", &fixture(), &OfflineClient)
        .await;
    assert!(answer.is_fallback());
    assert_eq!(answer.into_text(), "Your total expenses are ₹18,770.");
}

#[tokio::test]
async fn test_concurrent_questions_are_independent() {
    let orch = orchestrator();
    let txns = fixture();
    let client = ScriptedClient::new(Behaviour::Network);
    let (a, b) = tokio::join!(
        orch.answer("hello", &txns, &client),
        orch.answer("how do I invest", &txns, &client),
    );
    assert_eq!(a.text(), GREETING_TEXT);
    match b {
        Answer::Fallback { resolution, .. } => assert_eq!(resolution.intent, Intent::Investment),
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dyn_client() {
    let client: Box<dyn CompletionClient> = Box::new(OfflineClient);
    let answer = orchestrator().answer("hi", &[], client.as_ref()).await;
    assert_eq!(answer.text(), GREETING_TEXT);
}
