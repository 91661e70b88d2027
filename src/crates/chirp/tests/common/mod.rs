//! Test fakes for driving the REPL without a model server or network.

#![allow(dead_code)]

use async_trait::async_trait;
use chirp_core::{
    AccountId, AdapterError, ApiError, ApiResult, ConversationContext, Dispatcher, Handle,
    LlmClient, OperationRegistry, PostDraft, Session, SocialApi, Translator, TranslatorConfig,
    TweetId,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers with canned model output, one per call, then the last one forever.
pub struct CannedLlm {
    answers: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    calls: AtomicUsize,
}

impl CannedLlm {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            last: Mutex::new(String::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for CannedLlm {
    async fn invoke(&self, _prompt: &str) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.answers.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

/// Knows one account (`alice` = 1001) and records call names.
#[derive(Default)]
pub struct StubApi {
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl SocialApi for StubApi {
    async fn lookup_user_id(&self, username: &Handle) -> ApiResult<AccountId> {
        self.record("lookup_user_id");
        if username.as_str().eq_ignore_ascii_case("alice") {
            Ok(AccountId::new("1001"))
        } else {
            Err(ApiError::NotFound(format!("user {}", username)))
        }
    }

    async fn user_profile(&self, id: &AccountId) -> ApiResult<Value> {
        self.record("user_profile");
        Ok(json!({"data": {"id": id.as_str(), "username": "alice"}}))
    }

    async fn user_tweets(&self, _id: &AccountId, _limit: u32) -> ApiResult<Value> {
        self.record("user_tweets");
        Ok(json!({"data": []}))
    }

    async fn search_recent(&self, _query: &str, _limit: u32) -> ApiResult<Value> {
        self.record("search_recent");
        Ok(json!({"data": []}))
    }

    async fn create_post(&self, _draft: &PostDraft) -> ApiResult<Value> {
        self.record("create_post");
        Ok(json!({"data": {"id": "555"}}))
    }

    async fn like(&self, _tweet_id: &TweetId) -> ApiResult<Value> {
        self.record("like");
        Ok(json!({"data": {"liked": true}}))
    }

    async fn unlike(&self, _tweet_id: &TweetId) -> ApiResult<Value> {
        self.record("unlike");
        Ok(json!({"data": {"liked": false}}))
    }

    async fn home_timeline(&self, _limit: u32) -> ApiResult<Value> {
        self.record("home_timeline");
        Err(ApiError::RateLimited("too many requests".to_string()))
    }

    async fn delete_post(&self, _tweet_id: &TweetId) -> ApiResult<Value> {
        self.record("delete_post");
        Ok(json!({"data": {"deleted": true}}))
    }
}

pub fn session(
    llm: Arc<CannedLlm>,
    api: Arc<StubApi>,
    registry: OperationRegistry,
) -> Session<Arc<CannedLlm>, Arc<StubApi>> {
    let config = TranslatorConfig::new(2).with_retry_delay(Duration::ZERO);
    Session::new(
        Translator::new(llm, registry, config),
        Dispatcher::new(api),
        ConversationContext::new(10),
    )
}
