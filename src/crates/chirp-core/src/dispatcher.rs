//! API dispatcher: one validated request, one external call, one envelope.
//!
//! External failures never escape this boundary; they become failed
//! envelopes whose text keeps the failure kind ("rate limited: ...").
//! Nothing here retries, so mutating operations run at most once per
//! request.

use crate::api::{ApiResult, PostDraft, SocialApi};
use crate::envelope::ResponseEnvelope;
use crate::identity::IdentityCache;
use crate::request::ApiRequest;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Executes validated requests against a social API.
pub struct Dispatcher<A> {
    api: A,
}

impl<A: SocialApi> Dispatcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Execute one request, resolving handles through `identities` first.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        identities: &mut IdentityCache,
    ) -> ResponseEnvelope {
        let operation = request.operation();
        match self.call(request, identities).await {
            Ok(payload) => {
                info!(%operation, "Operation succeeded");
                ResponseEnvelope::success(normalize(payload))
            }
            Err(e) => {
                warn!(%operation, kind = e.kind(), error = %e, "Operation failed");
                ResponseEnvelope::failure(e.to_string())
            }
        }
    }

    async fn call(&self, request: &ApiRequest, identities: &mut IdentityCache) -> ApiResult<Value> {
        match request {
            ApiRequest::Profile { username } => {
                let id = identities.resolve(username, &self.api).await?;
                self.api.user_profile(&id).await
            }
            ApiRequest::Tweets { username, limit } => {
                let id = identities.resolve(username, &self.api).await?;
                self.api.user_tweets(&id, *limit).await
            }
            ApiRequest::Search { query, limit } => self.api.search_recent(query, *limit).await,
            ApiRequest::Post {
                text,
                media_path,
                reply_to_id,
            } => {
                let draft = PostDraft {
                    text: text.clone(),
                    media_path: media_path.clone(),
                    reply_to: reply_to_id.clone(),
                };
                self.api.create_post(&draft).await
            }
            ApiRequest::Like { tweet_id } => self.api.like(tweet_id).await,
            ApiRequest::Unlike { tweet_id } => self.api.unlike(tweet_id).await,
            ApiRequest::Timeline { limit } => self.api.home_timeline(*limit).await,
            ApiRequest::Delete { tweet_id } => self.api.delete_post(tweet_id).await,
        }
    }
}

/// Envelope data is always a JSON object.
fn normalize(payload: Value) -> Value {
    match payload {
        Value::Object(_) => payload,
        other => json!({ "result": other }),
    }
}
