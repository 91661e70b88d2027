//! Ollama client implementation.
//!
//! Provides integration with Ollama, a popular local LLM runner.
//! Supports models like Hermes 3, Llama 3, Mistral and more.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::config::LocalLlmConfig;
//! use chirp_core::LlmClient;
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "hermes3");
//! let client = OllamaClient::new(config)?;
//!
//! let raw = client.invoke("Convert this request ...").await?;
//! ```

use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use chirp_core::{AdapterError, LlmClient};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local LLM inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LocalLlmConfig {
        &self.config
    }

    /// Check if Ollama server is running.
    pub async fn check_health(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !response.status().is_success() {
            return Err(LlmError::ProviderError(
                "Failed to fetch models from Ollama".to_string(),
            ));
        }

        #[derive(Deserialize)]
        struct OllamaModelsResponse {
            models: Vec<OllamaModelInfo>,
        }

        #[derive(Deserialize)]
        struct OllamaModelInfo {
            name: String,
        }

        let models: OllamaModelsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(models.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model is installed. Tags default to `latest`.
    pub async fn has_model(&self) -> Result<bool> {
        let wanted = with_default_tag(&self.config.model);
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| with_default_tag(m) == wanted))
    }

    /// Build the request body for one prompt.
    fn build_request(&self, prompt: &str) -> OllamaRequest {
        let mut options = HashMap::new();
        if let Some(temp) = self.config.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            format: self.config.json_mode.then(|| "json".to_string()),
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        }
    }

    /// Send one chat request and return the assistant text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);
        let req_body = self.build_request(prompt);

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Sending prompt to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&req_body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &self.config.model, error_text));
        }

        let ollama_resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        debug!(
            model = %ollama_resp.model,
            prompt_tokens = ollama_resp.prompt_eval_count.unwrap_or(0),
            output_tokens = ollama_resp.eval_count.unwrap_or(0),
            total_duration_ns = ollama_resp.total_duration.unwrap_or(0),
            "Ollama answered"
        );

        if ollama_resp.message.content.trim().is_empty() {
            return Err(LlmError::InvalidResponse("empty message content".to_string()));
        }

        Ok(ollama_resp.message.content)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn invoke(&self, prompt: &str) -> std::result::Result<String, AdapterError> {
        self.complete(prompt).await.map_err(AdapterError::from)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn classify_status(status: StatusCode, model: &str, body: String) -> LlmError {
    match status {
        StatusCode::NOT_FOUND => LlmError::ModelNotFound(format!("{}: {}", model, body)),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded(body),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout(body),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            LlmError::ServiceUnavailable(body)
        }
        _ => LlmError::ProviderError(format!("Ollama API error {}: {}", status, body)),
    }
}

fn with_default_tag(model: &str) -> String {
    if model.contains(':') {
        model.to_string()
    } else {
        format!("{}:latest", model)
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}
