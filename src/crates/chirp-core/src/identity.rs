//! Per-session handle to account id cache.
//!
//! Entries never expire within a session. Comparison ignores ASCII case and
//! a single leading `@`.

use crate::api::{AccountId, ApiResult, SocialApi};
use crate::request::Handle;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// One resolved handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedIdentity {
    /// Normalized handle.
    pub handle: String,
    pub id: AccountId,
    pub resolved_at: DateTime<Utc>,
}

/// Handle to account id memo table.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    entries: HashMap<String, CachedIdentity>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized cache key for a handle.
    pub fn normalize(handle: &str) -> String {
        let trimmed = handle.trim();
        trimmed
            .strip_prefix('@')
            .unwrap_or(trimmed)
            .to_ascii_lowercase()
    }

    pub fn get(&self, handle: &str) -> Option<&CachedIdentity> {
        self.entries.get(&Self::normalize(handle))
    }

    /// Insert or replace the entry for a handle.
    pub fn insert(&mut self, handle: &str, id: AccountId) {
        let key = Self::normalize(handle);
        self.entries.insert(
            key.clone(),
            CachedIdentity {
                handle: key,
                id,
                resolved_at: Utc::now(),
            },
        );
    }

    /// Resolve a handle, calling the API only on a cache miss.
    ///
    /// Failed lookups are not cached.
    pub async fn resolve<A>(&mut self, handle: &Handle, api: &A) -> ApiResult<AccountId>
    where
        A: SocialApi + ?Sized,
    {
        if let Some(hit) = self.get(handle.as_str()) {
            debug!(handle = %handle, id = %hit.id, "Identity cache hit");
            return Ok(hit.id.clone());
        }

        debug!(handle = %handle, "Identity cache miss, looking up account");
        let id = api.lookup_user_id(handle).await?;
        self.insert(handle.as_str(), id.clone());
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedIdentity> {
        self.entries.values()
    }
}
