//! Common test fakes: a scripted model and a recording social API.

#![allow(dead_code)]

use async_trait::async_trait;
use chirp_core::{
    AccountId, AdapterError, ApiError, ApiResult, Handle, LlmClient, PostDraft, SocialApi, TweetId,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays canned model answers in order; repeats the last one when exhausted.
pub struct ScriptedLlm {
    answers: Mutex<VecDeque<Result<String, AdapterError>>>,
    last: Mutex<Option<Result<String, AdapterError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(answers: Vec<Result<String, AdapterError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    pub fn always(answer: Result<String, AdapterError>) -> Self {
        Self::new(vec![answer])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn invoke(&self, prompt: &str) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.answers.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(answer) => {
                *last = Some(answer.clone());
                answer
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(AdapterError::Model("no scripted answer".to_string()))),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Records every call; returns canned payloads or a configured failure.
#[derive(Default)]
pub struct FakeApi {
    ids: HashMap<String, String>,
    fail_with: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert("alice".to_string(), "1001".to_string());
        ids.insert("bob".to_string(), "1002".to_string());
        Self {
            ids,
            ..Default::default()
        }
    }

    /// Make every subsequent call fail with `error`.
    pub fn failing(self, error: ApiError) -> Self {
        *self.fail_with.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(name)).count()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SocialApi for FakeApi {
    async fn lookup_user_id(&self, username: &Handle) -> ApiResult<AccountId> {
        self.record(format!("lookup_user_id {}", username.as_str()))?;
        self.ids
            .get(&username.as_str().to_ascii_lowercase())
            .map(|id| AccountId::new(id.clone()))
            .ok_or_else(|| ApiError::NotFound(format!("user {}", username)))
    }

    async fn user_profile(&self, id: &AccountId) -> ApiResult<Value> {
        self.record(format!("user_profile {}", id))?;
        Ok(json!({"data": {"id": id.as_str(), "name": "Test User"}}))
    }

    async fn user_tweets(&self, id: &AccountId, limit: u32) -> ApiResult<Value> {
        self.record(format!("user_tweets {} {}", id, limit))?;
        let tweets: Vec<Value> = (0..limit)
            .map(|n| json!({"id": format!("9{}", n), "text": format!("post {}", n)}))
            .collect();
        Ok(json!({ "data": tweets }))
    }

    async fn search_recent(&self, query: &str, limit: u32) -> ApiResult<Value> {
        self.record(format!("search_recent {} {}", query, limit))?;
        Ok(json!({"data": []}))
    }

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Value> {
        self.record(format!("create_post {}", draft.text))?;
        Ok(json!({"data": {"id": "555", "text": draft.text}}))
    }

    async fn like(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        self.record(format!("like {}", tweet_id))?;
        Ok(json!({"data": {"liked": true}}))
    }

    async fn unlike(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        self.record(format!("unlike {}", tweet_id))?;
        Ok(json!({"data": {"liked": false}}))
    }

    async fn home_timeline(&self, limit: u32) -> ApiResult<Value> {
        self.record(format!("home_timeline {}", limit))?;
        Ok(json!({"data": []}))
    }

    async fn delete_post(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        self.record(format!("delete_post {}", tweet_id))?;
        Ok(json!({"data": {"deleted": true}}))
    }
}
