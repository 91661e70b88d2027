//! Local LLM provider implementations.
//!
//! Providers for models served on localhost or the local network. They need
//! no API key and keep utterances on the machine.
//!
//! # Providers
//!
//! - **Ollama** - Popular local LLM runner with wide model support

pub mod ollama;

pub use ollama::OllamaClient;
