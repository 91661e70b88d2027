//! Wiring: build a live session from configuration.

use crate::config::ChirpConfig;
use crate::Result;
use chirp_core::{ConversationContext, Dispatcher, Session, Translator};
use llm::OllamaClient;
use tracing::info;
use xapi::XApiClient;

/// A session against a local Ollama server and the X API.
pub type LiveSession = Session<OllamaClient, XApiClient>;

pub fn build_llm(config: &ChirpConfig) -> Result<OllamaClient> {
    Ok(OllamaClient::new(config.llm_config())?)
}

pub fn build_api(config: &ChirpConfig) -> Result<XApiClient> {
    Ok(XApiClient::new(config.api_config()?)?)
}

pub fn build_session(config: &ChirpConfig) -> Result<LiveSession> {
    let registry = config.registry();
    info!(
        model = %config.llm.model,
        operations = %registry.names(),
        max_attempts = config.session.max_attempts,
        history = config.session.history_capacity,
        "Starting session"
    );

    let translator = Translator::new(build_llm(config)?, registry, config.translator_config());
    Ok(Session::new(
        translator,
        Dispatcher::new(build_api(config)?),
        ConversationContext::new(config.session.history_capacity),
    ))
}
