//! Language model boundary.
//!
//! The pipeline only needs "send a prompt, get text back". Concrete clients
//! live in the `llm` crate.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a model client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The model did not answer within the transport's deadline.
    #[error("model request timed out: {0}")]
    Timeout(String),

    /// The model server could not be reached or the exchange broke.
    #[error("model transport failed: {0}")]
    Transport(String),

    /// The model server answered with an error.
    #[error("model error: {0}")]
    Model(String),
}

/// A client that turns a prompt into raw model text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the model's raw answer.
    async fn invoke(&self, prompt: &str) -> Result<String, AdapterError>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn invoke(&self, prompt: &str) -> Result<String, AdapterError> {
        (**self).invoke(prompt).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Box<T> {
    async fn invoke(&self, prompt: &str) -> Result<String, AdapterError> {
        (**self).invoke(prompt).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
