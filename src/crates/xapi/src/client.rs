//! X v2 REST client.
//!
//! Implements [`SocialApi`] over the v2 endpoints with bearer-token auth.
//! Endpoints that enforce a minimum page size are asked for at least that
//! many results and the payload is cut back to the requested count, so the
//! caller's limit is always what it gets.

use crate::config::XApiConfig;
use crate::error::{Result, XApiError};
use async_trait::async_trait;
use chirp_core::{AccountId, ApiError, ApiResult, Handle, PostDraft, SocialApi, TweetId};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Largest page any v2 list endpoint returns.
const MAX_PAGE: u32 = 100;
/// `GET /2/users/:id/tweets` rejects `max_results` below 5.
const MIN_USER_TWEETS_PAGE: u32 = 5;
/// `GET /2/tweets/search/recent` rejects `max_results` below 10.
const MIN_SEARCH_PAGE: u32 = 10;
/// The reverse-chronological timeline accepts a single result.
const MIN_TIMELINE_PAGE: u32 = 1;

const USER_FIELDS: &str = "created_at,description,location,public_metrics,verified";
const TWEET_FIELDS: &str = "created_at,author_id,conversation_id,public_metrics";

/// Client for the X v2 API.
pub struct XApiClient {
    config: XApiConfig,
    client: Client,
    /// Id of the authenticated account, looked up on first use.
    me: OnceCell<AccountId>,
}

impl XApiClient {
    /// Create a new client. Fails when the bearer token is empty.
    pub fn new(config: XApiConfig) -> Result<Self> {
        if config.bearer_token.trim().is_empty() {
            return Err(XApiError::ConfigError(
                "bearer token is empty (set X_BEARER_TOKEN or api.bearer_token)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chirp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| XApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            me: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &XApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(&self.config.bearer_token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let reset = response
                .headers()
                .get("x-rate-limit-reset")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "X API request failed");
            return Err(XApiError::from_status(status, &body, reset));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| XApiError::InvalidResponse(e.to_string()))?;

        match XApiError::from_payload(&payload) {
            Some(err) => Err(err),
            None => Ok(payload),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        debug!(path, "GET");
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        debug!(path, "POST");
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await
    }

    /// Id of the account the token belongs to.
    pub async fn me(&self) -> Result<&AccountId> {
        self.me
            .get_or_try_init(|| async {
                let payload = self.get("/2/users/me", &[]).await?;
                let id = data_id(&payload)?;
                info!(id = %id, "Resolved authenticated account");
                Ok::<_, XApiError>(id)
            })
            .await
    }

    async fn fetch_user_id(&self, username: &Handle) -> Result<AccountId> {
        let payload = self
            .get(&format!("/2/users/by/username/{}", username.as_str()), &[])
            .await?;
        data_id(&payload)
    }

    async fn fetch_list(
        &self,
        path: &str,
        mut query: Vec<(&str, String)>,
        limit: u32,
        min_page: u32,
    ) -> Result<Value> {
        query.push(("max_results", page_size(limit, min_page).to_string()));
        query.push(("tweet.fields", TWEET_FIELDS.to_string()));
        let payload = self.get(path, &query).await?;
        Ok(truncate_data(payload, limit))
    }
}

#[async_trait]
impl SocialApi for XApiClient {
    async fn lookup_user_id(&self, username: &Handle) -> ApiResult<AccountId> {
        Ok(self.fetch_user_id(username).await?)
    }

    async fn user_profile(&self, id: &AccountId) -> ApiResult<Value> {
        let query = [("user.fields", USER_FIELDS.to_string())];
        Ok(self.get(&format!("/2/users/{}", id), &query).await?)
    }

    async fn user_tweets(&self, id: &AccountId, limit: u32) -> ApiResult<Value> {
        let path = format!("/2/users/{}/tweets", id);
        Ok(self
            .fetch_list(&path, Vec::new(), limit, MIN_USER_TWEETS_PAGE)
            .await?)
    }

    async fn search_recent(&self, query: &str, limit: u32) -> ApiResult<Value> {
        let params = vec![("query", query.to_string())];
        Ok(self
            .fetch_list("/2/tweets/search/recent", params, limit, MIN_SEARCH_PAGE)
            .await?)
    }

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Value> {
        let body = post_body(draft)?;
        Ok(self.post("/2/tweets", &body).await?)
    }

    async fn like(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        let me = self.me().await?;
        let body = json!({ "tweet_id": tweet_id.as_str() });
        Ok(self.post(&format!("/2/users/{}/likes", me), &body).await?)
    }

    async fn unlike(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        let me = self.me().await?;
        Ok(self
            .delete(&format!("/2/users/{}/likes/{}", me, tweet_id))
            .await?)
    }

    async fn home_timeline(&self, limit: u32) -> ApiResult<Value> {
        let me = self.me().await?;
        let path = format!("/2/users/{}/timelines/reverse_chronological", me);
        Ok(self
            .fetch_list(&path, Vec::new(), limit, MIN_TIMELINE_PAGE)
            .await?)
    }

    async fn delete_post(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        Ok(self.delete(&format!("/2/tweets/{}", tweet_id)).await?)
    }
}

/// Page size to request for `limit` on an endpoint with the given minimum.
pub(crate) fn page_size(limit: u32, min_page: u32) -> u32 {
    limit.clamp(min_page, MAX_PAGE)
}

/// Cut the `data` array back to `limit` entries and fix up the count.
pub(crate) fn truncate_data(mut payload: Value, limit: u32) -> Value {
    let limit = limit as usize;
    let kept = match payload.get_mut("data").and_then(Value::as_array_mut) {
        Some(items) if items.len() > limit => {
            items.truncate(limit);
            items.len()
        }
        _ => return payload,
    };
    if let Some(meta) = payload.get_mut("meta").and_then(Value::as_object_mut) {
        meta.insert("result_count".to_string(), json!(kept));
    }
    payload
}

/// JSON body for `POST /2/tweets`.
pub(crate) fn post_body(draft: &PostDraft) -> std::result::Result<Value, ApiError> {
    if let Some(path) = &draft.media_path {
        return Err(XApiError::Unsupported(format!(
            "media upload is not supported (media_path: {})",
            path
        ))
        .into());
    }

    let mut body = json!({ "text": draft.text });
    if let Some(reply_to) = &draft.reply_to {
        body["reply"] = json!({ "in_reply_to_tweet_id": reply_to.as_str() });
    }
    Ok(body)
}

fn data_id(payload: &Value) -> Result<AccountId> {
    payload
        .pointer("/data/id")
        .and_then(Value::as_str)
        .map(AccountId::new)
        .ok_or_else(|| XApiError::InvalidResponse("response has no data.id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_rejected() {
        let err = XApiClient::new(XApiConfig::new("  ")).err().unwrap();
        assert!(matches!(err, XApiError::ConfigError(_)));
    }

    #[test]
    fn test_page_size_respects_endpoint_minimum() {
        assert_eq!(page_size(1, MIN_USER_TWEETS_PAGE), 5);
        assert_eq!(page_size(3, MIN_SEARCH_PAGE), 10);
        assert_eq!(page_size(20, MIN_SEARCH_PAGE), 20);
        assert_eq!(page_size(1, MIN_TIMELINE_PAGE), 1);
        assert_eq!(page_size(100, MIN_SEARCH_PAGE), 100);
    }

    #[test]
    fn test_truncate_data_to_requested_limit() {
        let payload = json!({
            "data": [{"id": "1"}, {"id": "2"}, {"id": "3"}, {"id": "4"}, {"id": "5"}],
            "meta": {"result_count": 5, "newest_id": "5"}
        });

        let out = truncate_data(payload, 2);

        assert_eq!(out["data"], json!([{"id": "1"}, {"id": "2"}]));
        assert_eq!(out["meta"]["result_count"], 2);
        assert_eq!(out["meta"]["newest_id"], "5");
    }

    #[test]
    fn test_truncate_data_leaves_short_pages() {
        let payload = json!({"data": [{"id": "1"}], "meta": {"result_count": 1}});
        assert_eq!(truncate_data(payload.clone(), 10), payload);

        let empty = json!({"meta": {"result_count": 0}});
        assert_eq!(truncate_data(empty.clone(), 10), empty);
    }

    #[test]
    fn test_post_body_with_reply() {
        let draft = PostDraft {
            text: "hello".to_string(),
            media_path: None,
            reply_to: TweetId::parse("1460323737035677698"),
        };
        assert_eq!(
            post_body(&draft).unwrap(),
            json!({"text": "hello", "reply": {"in_reply_to_tweet_id": "1460323737035677698"}})
        );
    }

    #[test]
    fn test_post_body_media_unsupported() {
        let draft = PostDraft {
            text: "look".to_string(),
            media_path: Some("cat.png".to_string()),
            reply_to: None,
        };
        let err = post_body(&draft).unwrap_err();
        assert_eq!(err.kind(), "unsupported");
        assert!(err.to_string().contains("cat.png"));
    }

    #[test]
    fn test_data_id() {
        let payload = json!({"data": {"id": "2244994945", "username": "XDevelopers"}});
        assert_eq!(data_id(&payload).unwrap(), AccountId::new("2244994945"));
        assert!(data_id(&json!({"data": {}})).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = XApiConfig::new("token")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(std::time::Duration::from_secs(2));
        let client = XApiClient::new(config).unwrap();

        let err = client
            .lookup_user_id(&Handle::parse("alice").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
