//! Request types: untrusted candidates and validated API requests.

use crate::registry::{Operation, OperationSpec, MAX_HANDLE_CHARS, MAX_TWEET_ID_DIGITS};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Unchecked operation and parameters extracted from model output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRequest {
    pub operation: String,
    pub params: Map<String, Value>,
}

impl CandidateRequest {
    pub fn new(operation: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            operation: operation.into(),
            params,
        }
    }
}

/// A syntactically valid account handle, stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Parse a handle, tolerating surrounding whitespace and one leading `@`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
        let valid = !bare.is_empty()
            && bare.chars().count() <= MAX_HANDLE_CHARS
            && bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Numeric post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TweetId(String);

impl TweetId {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_TWEET_ID_DIGITS
            && raw.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request that passed full schema validation.
///
/// One variant per registry operation. Serializes as
/// `{"operation": "...", "params": {...}}`, the same shape the model emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", content = "params", rename_all = "snake_case")]
pub enum ApiRequest {
    Profile {
        username: Handle,
    },
    Tweets {
        username: Handle,
        limit: u32,
    },
    Search {
        query: String,
        limit: u32,
    },
    Post {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        media_path: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reply_to_id: Option<TweetId>,
    },
    Like {
        tweet_id: TweetId,
    },
    Unlike {
        tweet_id: TweetId,
    },
    Timeline {
        limit: u32,
    },
    Delete {
        tweet_id: TweetId,
    },
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::Profile { .. } => Operation::Profile,
            ApiRequest::Tweets { .. } => Operation::Tweets,
            ApiRequest::Search { .. } => Operation::Search,
            ApiRequest::Post { .. } => Operation::Post,
            ApiRequest::Like { .. } => Operation::Like,
            ApiRequest::Unlike { .. } => Operation::Unlike,
            ApiRequest::Timeline { .. } => Operation::Timeline,
            ApiRequest::Delete { .. } => Operation::Delete,
        }
    }

    pub fn spec(&self) -> &'static OperationSpec {
        self.operation().spec()
    }

    /// The account handle this request targets, if any.
    pub fn handle(&self) -> Option<&Handle> {
        match self {
            ApiRequest::Profile { username } | ApiRequest::Tweets { username, .. } => {
                Some(username)
            }
            _ => None,
        }
    }

    /// Compact JSON rendering used in prompts and logs.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"operation\":\"{}\"}}", self.operation()))
    }
}
