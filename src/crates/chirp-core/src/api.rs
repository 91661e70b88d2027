//! Social media API boundary.
//!
//! One method per external call the dispatcher makes. Payloads are returned
//! as opaque JSON; failures keep their distinguishing kind so it survives
//! into the response envelope.

use crate::request::{Handle, TweetId};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for social API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Resolved account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments of a post creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub media_path: Option<String>,
    pub reply_to: Option<TweetId>,
}

/// Failure of an external API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("api error: {0}")]
    Other(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Transport(_) => "transport",
            ApiError::Unsupported(_) => "unsupported",
            ApiError::Other(_) => "other",
        }
    }
}

/// The social media platform, as seen by the dispatcher.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Resolve a handle to its account id.
    async fn lookup_user_id(&self, username: &Handle) -> ApiResult<AccountId>;

    async fn user_profile(&self, id: &AccountId) -> ApiResult<Value>;

    async fn user_tweets(&self, id: &AccountId, limit: u32) -> ApiResult<Value>;

    async fn search_recent(&self, query: &str, limit: u32) -> ApiResult<Value>;

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Value>;

    async fn like(&self, tweet_id: &TweetId) -> ApiResult<Value>;

    async fn unlike(&self, tweet_id: &TweetId) -> ApiResult<Value>;

    async fn home_timeline(&self, limit: u32) -> ApiResult<Value>;

    async fn delete_post(&self, tweet_id: &TweetId) -> ApiResult<Value>;
}

#[async_trait]
impl<T: SocialApi + ?Sized> SocialApi for Arc<T> {
    async fn lookup_user_id(&self, username: &Handle) -> ApiResult<AccountId> {
        (**self).lookup_user_id(username).await
    }

    async fn user_profile(&self, id: &AccountId) -> ApiResult<Value> {
        (**self).user_profile(id).await
    }

    async fn user_tweets(&self, id: &AccountId, limit: u32) -> ApiResult<Value> {
        (**self).user_tweets(id, limit).await
    }

    async fn search_recent(&self, query: &str, limit: u32) -> ApiResult<Value> {
        (**self).search_recent(query, limit).await
    }

    async fn create_post(&self, draft: &PostDraft) -> ApiResult<Value> {
        (**self).create_post(draft).await
    }

    async fn like(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        (**self).like(tweet_id).await
    }

    async fn unlike(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        (**self).unlike(tweet_id).await
    }

    async fn home_timeline(&self, limit: u32) -> ApiResult<Value> {
        (**self).home_timeline(limit).await
    }

    async fn delete_post(&self, tweet_id: &TweetId) -> ApiResult<Value> {
        (**self).delete_post(tweet_id).await
    }
}
