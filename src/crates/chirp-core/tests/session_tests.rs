//! End-to-end tests: utterance through translation, dispatch and context

mod common;

use chirp_core::{
    ApiError, ApiRequest, ConversationContext, Dispatcher, Handle, IdentityCache, Operation,
    OperationRegistry, Session, Translator, TranslatorConfig, TweetId,
};
use common::{FakeApi, ScriptedLlm};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

type TestSession = Session<Arc<ScriptedLlm>, Arc<FakeApi>>;

fn session_with(llm: Arc<ScriptedLlm>, api: Arc<FakeApi>, registry: OperationRegistry) -> TestSession {
    let config = TranslatorConfig::new(3).with_retry_delay(Duration::ZERO);
    Session::new(
        Translator::new(llm, registry, config),
        Dispatcher::new(api),
        ConversationContext::new(10),
    )
}

fn session(llm: Arc<ScriptedLlm>, api: Arc<FakeApi>) -> TestSession {
    session_with(llm, api, OperationRegistry::standard())
}

#[tokio::test]
async fn test_profile_lookup_populates_cache() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "profile", "params": {"username": "alice"}}"#,
    ]));
    let api = Arc::new(FakeApi::new());
    let mut session = session_with(
        llm,
        api.clone(),
        OperationRegistry::with_operations(&[Operation::Profile]),
    );

    let report = session.translate_and_execute("show me @alice's profile").await;

    assert_eq!(
        report.request,
        Some(ApiRequest::Profile {
            username: Handle::parse("alice").unwrap()
        })
    );
    assert!(report.envelope.is_success());
    assert_eq!(report.envelope.data().unwrap()["data"]["id"], json!("1001"));
    assert_eq!(api.calls(), vec!["lookup_user_id alice", "user_profile 1001"]);
    assert!(session.identities().get("Alice").is_some());
    assert_eq!(session.context().len(), 1);
}

#[tokio::test]
async fn test_tweets_limit_passes_through() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "tweets", "params": {"username": "bob", "limit": 5}}"#,
    ]));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm, api.clone());

    let report = session.translate_and_execute("get the last 5 tweets from @bob").await;

    assert_eq!(
        report.request,
        Some(ApiRequest::Tweets {
            username: Handle::parse("bob").unwrap(),
            limit: 5
        })
    );
    assert_eq!(api.calls(), vec!["lookup_user_id bob", "user_tweets 1002 5"]);
}

#[tokio::test]
async fn test_second_turn_hits_identity_cache() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "profile", "params": {"username": "bob"}}"#,
        r#"{"operation": "tweets", "params": {"username": "@Bob", "limit": 3}}"#,
    ]));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm.clone(), api.clone());

    session.translate_and_execute("who is @bob").await;
    session.translate_and_execute("and his last 3 tweets").await;

    assert_eq!(api.count("lookup_user_id"), 1);
    assert_eq!(session.identities().len(), 1);
    // The second prompt carries the first turn for reference resolution.
    assert!(llm.prompts()[1].contains("User: who is @bob"));
}

#[tokio::test]
async fn test_out_of_range_then_corrected() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "tweets", "params": {"username": "bob", "limit": "9999"}}"#,
        r#"{"operation": "tweets", "params": {"username": "bob", "limit": "10"}}"#,
    ]));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm, api.clone());

    let report = session.translate_and_execute("every tweet bob ever wrote").await;

    assert_eq!(report.attempts, 2);
    assert!(report.envelope.is_success());
    assert_eq!(api.calls(), vec!["lookup_user_id bob", "user_tweets 1002 10"]);
}

#[tokio::test]
async fn test_rate_limited_is_enveloped_and_recorded() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "timeline", "params": {"limit": 20}}"#,
    ]));
    let api = Arc::new(FakeApi::new().failing(ApiError::RateLimited(
        "too many requests, resets in 900s".to_string(),
    )));
    let mut session = session(llm, api);

    let report = session.translate_and_execute("what's on my timeline").await;

    assert!(!report.envelope.is_success());
    assert!(report.envelope.error().unwrap().starts_with("rate limited"));

    let turn = session.context().last().unwrap();
    assert_eq!(turn.request, Some(ApiRequest::Timeline { limit: 20 }));
    assert_eq!(turn.response.as_ref(), Some(&report.envelope));
}

#[tokio::test]
async fn test_translation_failure_is_not_dispatched() {
    let llm = Arc::new(ScriptedLlm::always(Ok("Sorry, I can't help with that.".to_string())));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm.clone(), api.clone());

    let report = session.translate_and_execute("order me a pizza").await;

    assert!(!report.was_understood());
    assert_eq!(report.attempts, 3);
    assert!(report
        .envelope
        .error()
        .unwrap()
        .starts_with("could not understand request"));
    assert!(api.calls().is_empty());

    let turn = session.context().last().unwrap();
    assert!(turn.request.is_none());
    assert!(turn.response.is_none());
}

#[tokio::test]
async fn test_failed_lookup_is_not_cached() {
    let llm = Arc::new(ScriptedLlm::always(Ok(
        r#"{"operation": "profile", "params": {"username": "ghost"}}"#.to_string(),
    )));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm, api.clone());

    let first = session.translate_and_execute("profile of @ghost").await;
    let second = session.translate_and_execute("try @ghost again").await;

    assert!(first.envelope.error().unwrap().starts_with("not found"));
    assert!(!second.envelope.is_success());
    assert_eq!(api.count("lookup_user_id"), 2);
    assert!(session.identities().is_empty());
}

#[tokio::test]
async fn test_like_refers_to_previous_result() {
    let llm = Arc::new(ScriptedLlm::answering(&[
        r#"{"operation": "tweets", "params": {"username": "alice", "limit": 1}}"#,
        r#"{"operation": "like", "params": {"tweet_id": "90"}}"#,
    ]));
    let api = Arc::new(FakeApi::new());
    let mut session = session(llm.clone(), api.clone());

    session.translate_and_execute("alice's latest tweet").await;
    let report = session.translate_and_execute("like it").await;

    assert_eq!(
        report.request,
        Some(ApiRequest::Like {
            tweet_id: TweetId::parse("90").unwrap()
        })
    );
    assert_eq!(api.count("like"), 1);
    assert!(llm.prompts()[1].contains("\"id\":\"90\""));
}

#[tokio::test]
async fn test_context_cap_enforced_by_session() {
    let llm = Arc::new(ScriptedLlm::always(Ok(r#"{"operation": "timeline"}"#.to_string())));
    let api = Arc::new(FakeApi::new());
    let config = TranslatorConfig::new(3).with_retry_delay(Duration::ZERO);
    let mut session = Session::new(
        Translator::new(llm, OperationRegistry::standard(), config),
        Dispatcher::new(api),
        ConversationContext::new(2),
    );

    for n in 0..3 {
        session.translate_and_execute(&format!("timeline {}", n)).await;
    }

    let utterances: Vec<_> = session
        .context()
        .iter()
        .map(|t| t.utterance.clone())
        .collect();
    assert_eq!(utterances, vec!["timeline 1", "timeline 2"]);
}

#[tokio::test]
async fn test_resolve_twice_issues_one_lookup() {
    let api = FakeApi::new();
    let mut cache = IdentityCache::new();
    let handle = Handle::parse("@Alice").unwrap();

    let first = cache.resolve(&handle, &api).await.unwrap();
    let second = cache
        .resolve(&Handle::parse("alice").unwrap(), &api)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(api.count("lookup_user_id"), 1);
}
