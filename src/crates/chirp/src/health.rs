//! Health check for the local model server

use llm::OllamaClient;
use serde::Serialize;
use tracing::debug;

/// Outcome of probing Ollama.
#[derive(Debug, Clone, Serialize)]
pub struct LlmHealth {
    pub base_url: String,
    pub model: String,
    /// Server answered `/api/tags`.
    pub reachable: bool,
    /// Whether the configured model is pulled; `None` when unreachable.
    pub model_installed: Option<bool>,
    pub error: Option<String>,
}

impl LlmHealth {
    pub fn is_healthy(&self) -> bool {
        self.reachable && self.model_installed == Some(true)
    }
}

/// Probe the server and look for the configured model.
pub async fn check_llm(client: &OllamaClient) -> LlmHealth {
    let config = client.config();
    let mut health = LlmHealth {
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        reachable: false,
        model_installed: None,
        error: None,
    };

    match client.check_health().await {
        Ok(true) => health.reachable = true,
        Ok(false) => return health,
        Err(e) => {
            health.error = Some(e.to_string());
            return health;
        }
    }

    match client.has_model().await {
        Ok(installed) => health.model_installed = Some(installed),
        Err(e) => {
            debug!(error = %e, "Model listing failed");
            health.error = Some(e.to_string());
        }
    }
    health
}
