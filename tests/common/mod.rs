#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use chat_relay::{
    config::Config,
    routes::create_router,
    services::completion::{CompletionError, CompletionRequest, CompletionService},
    state::AppState,
};

/// What the fake completion service does on every call.
#[derive(Clone, Debug)]
pub enum Script {
    Reply(Option<&'static str>),
    Status(StatusCode, &'static str),
    Malformed,
    Panic,
}

/// Records every upstream request and answers from its script.
pub struct FakeCompletions {
    script: Script,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletions {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self { script, seen: Mutex::new(Vec::new()) })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, CompletionError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(text.map(str::to_string)),
            Script::Status(status, body) => Err(CompletionError::Status {
                status: *status,
                body: body.to_string(),
            }),
            Script::Malformed => Err(CompletionError::Decode("expected value at line 1".into())),
            Script::Panic => panic!("completion fake exploded"),
        }
    }
}

pub fn test_config(extra: &[(&str, &str)]) -> Config {
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        if key == "OPENAI_API_KEY" {
            return Some("test-key".to_string());
        }
        extra.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    })
    .unwrap()
}

pub fn app_with(config: Config, completions: Arc<dyn CompletionService>) -> Router {
    create_router(Arc::new(AppState::new(config, completions)))
}

pub fn chat_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
