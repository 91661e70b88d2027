//! Configuration schema for chirp

use crate::error::ConfigError;
use chirp_core::{OperationRegistry, TranslatorConfig};
use llm::LocalLlmConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use xapi::XApiConfig;

/// Main chirp configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChirpConfig {
    /// Local model server
    #[serde(default)]
    pub llm: LlmConfig,

    /// X API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Translation and conversation settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local LLM configuration (Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama server URL
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature; omit to use the model default
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "hermes3".to_string(),
            timeout_secs: 60,
            temperature: Some(0.0),
        }
    }
}

/// X API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API host
    pub base_url: String,

    /// Bearer token (supports environment variable interpolation)
    pub bearer_token: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: xapi::config::DEFAULT_BASE_URL.to_string(),
            bearer_token: "${X_BEARER_TOKEN}".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Turns kept in the conversation context
    pub history_capacity: usize,

    /// Prior turns shown to the model in each prompt
    pub prompt_turns: usize,

    /// Model calls allowed per utterance
    pub max_attempts: u32,

    /// Pause before retrying an unreachable model, in milliseconds
    pub retry_delay_ms: u64,

    /// Only enable operations that do not change account state
    pub read_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: chirp_core::context::DEFAULT_CAPACITY,
            prompt_turns: chirp_core::prompt::DEFAULT_PROMPT_TURNS,
            max_attempts: 3,
            retry_delay_ms: 1000,
            read_only: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub ollama_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub history: Option<usize>,
    pub read_only: bool,
}

impl ChirpConfig {
    /// Parse a TOML document; missing sections and fields take defaults.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command line overrides (highest precedence)
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(model) = &overrides.model {
            self.llm.model = model.clone();
        }
        if let Some(url) = &overrides.ollama_url {
            self.llm.base_url = url.clone();
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.session.max_attempts = max_attempts;
        }
        if let Some(history) = overrides.history {
            self.session.history_capacity = history;
        }
        if overrides.read_only {
            self.session.read_only = true;
        }
    }

    /// Resolve environment variables in configuration values
    ///
    /// Supports ${VAR_NAME} syntax in string fields
    pub fn resolve_env_vars(&mut self) {
        self.llm.base_url = Self::expand_env_var(&self.llm.base_url);
        self.llm.model = Self::expand_env_var(&self.llm.model);
        self.api.base_url = Self::expand_env_var(&self.api.base_url);
        self.api.bearer_token = Self::expand_env_var(&self.api.bearer_token);
    }

    /// Expand environment variable in a string
    ///
    /// Supports ${VAR_NAME} syntax. Unset variables are left as written.
    fn expand_env_var(value: &str) -> String {
        match Self::placeholder(value) {
            Some(var_name) => std::env::var(var_name).unwrap_or_else(|_| value.to_string()),
            None => value.to_string(),
        }
    }

    fn placeholder(value: &str) -> Option<&str> {
        value.strip_prefix("${")?.strip_suffix('}')
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "session.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.session.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "session.history_capacity must be at least 1".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        Ok(())
    }

    /// The bearer token, or an error naming the unset variable.
    pub fn bearer_token(&self) -> Result<&str, ConfigError> {
        let token = self.api.bearer_token.trim();
        if let Some(var_name) = Self::placeholder(token) {
            return Err(ConfigError::Invalid(format!(
                "environment variable {} is not set (needed for api.bearer_token)",
                var_name
            )));
        }
        if token.is_empty() {
            return Err(ConfigError::Invalid("api.bearer_token is empty".to_string()));
        }
        Ok(token)
    }

    pub fn llm_config(&self) -> LocalLlmConfig {
        LocalLlmConfig::new(&self.llm.base_url, &self.llm.model)
            .with_timeout(Duration::from_secs(self.llm.timeout_secs))
            .with_temperature(self.llm.temperature)
    }

    pub fn api_config(&self) -> Result<XApiConfig, ConfigError> {
        Ok(XApiConfig::new(self.bearer_token()?)
            .with_base_url(&self.api.base_url)
            .with_timeout(Duration::from_secs(self.api.timeout_secs)))
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig::new(self.session.max_attempts)
            .with_retry_delay(Duration::from_millis(self.session.retry_delay_ms))
            .with_prompt_turns(self.session.prompt_turns)
    }

    pub fn registry(&self) -> OperationRegistry {
        if self.session.read_only {
            OperationRegistry::read_only()
        } else {
            OperationRegistry::standard()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_core::Operation;

    #[test]
    fn test_default_config() {
        let config = ChirpConfig::default();
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.model, "hermes3");
        assert_eq!(config.api.bearer_token, "${X_BEARER_TOKEN}");
        assert_eq!(config.session.history_capacity, 20);
        assert_eq!(config.session.prompt_turns, 5);
        assert_eq!(config.session.max_attempts, 3);
        assert_eq!(config.session.retry_delay_ms, 1000);
        assert!(!config.session.read_only);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let config = ChirpConfig::from_toml_str(
            r#"
[llm]
model = "llama3"

[session]
max_attempts = 5
"#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.session.max_attempts, 5);
        assert_eq!(config.session.history_capacity, 20);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ChirpConfig::default();
        config.apply_overrides(&CliOverrides {
            model: Some("mistral".to_string()),
            ollama_url: Some("http://gpu-box:11434".to_string()),
            max_attempts: Some(1),
            history: Some(4),
            read_only: true,
        });

        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.session.max_attempts, 1);
        assert_eq!(config.session.history_capacity, 4);
        assert!(config.session.read_only);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut config = ChirpConfig::default();
        config.session.read_only = true;
        config.apply_overrides(&CliOverrides::default());
        assert_eq!(config.llm.model, "hermes3");
        assert!(config.session.read_only);
    }

    #[test]
    fn test_env_var_expansion() {
        let mut config = ChirpConfig::default();
        config.api.bearer_token = "${CHIRP_TEST_BEARER}".to_string();

        std::env::set_var("CHIRP_TEST_BEARER", "AAAA-test-token");
        config.resolve_env_vars();

        assert_eq!(config.api.bearer_token, "AAAA-test-token");
        assert_eq!(config.bearer_token().unwrap(), "AAAA-test-token");

        std::env::remove_var("CHIRP_TEST_BEARER");
    }

    #[test]
    fn test_unset_env_var_reported_by_name() {
        let mut config = ChirpConfig::default();
        config.api.bearer_token = "${CHIRP_TEST_UNSET_TOKEN}".to_string();
        config.resolve_env_vars();

        let err = config.bearer_token().unwrap_err();
        assert!(err.to_string().contains("CHIRP_TEST_UNSET_TOKEN"));
        assert!(config.api_config().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = ChirpConfig::default();
        assert!(config.validate().is_ok());

        config.session.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_derived_configs() {
        let mut config = ChirpConfig::default();
        config.session.retry_delay_ms = 250;
        config.session.prompt_turns = 2;
        config.llm.timeout_secs = 10;

        let translator = config.translator_config();
        assert_eq!(translator.max_attempts, 3);
        assert_eq!(translator.retry_delay, Duration::from_millis(250));
        assert_eq!(translator.prompt_turns, 2);

        let llm = config.llm_config();
        assert_eq!(llm.timeout, Duration::from_secs(10));
        assert_eq!(llm.temperature, Some(0.0));
    }

    #[test]
    fn test_read_only_registry() {
        let mut config = ChirpConfig::default();
        assert!(config.registry().contains(Operation::Post));

        config.session.read_only = true;
        let registry = config.registry();
        assert!(!registry.contains(Operation::Post));
        assert!(!registry.contains(Operation::Delete));
        assert!(registry.contains(Operation::Search));
    }
}
