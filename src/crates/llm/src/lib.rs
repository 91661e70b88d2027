//! LLM provider implementations for chirp.
//!
//! This crate provides concrete implementations of the `LlmClient` trait from
//! `chirp-core`. The translator only needs "prompt in, raw text out", so the
//! clients here are deliberately thin: one non-streaming call per prompt,
//! with transport failures classified into the adapter error kinds the
//! translator counts against its attempt bound.
//!
//! # Local Providers
//!
//! - **Ollama** - Popular local LLM runner with wide model support
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::config::LocalLlmConfig;
//! use chirp_core::LlmClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LocalLlmConfig::new("http://localhost:11434", "hermes3");
//!     let client = OllamaClient::new(config)?;
//!
//!     let raw = client.invoke("Reply with {\"operation\": \"timeline\"}").await?;
//!     println!("Response: {}", raw);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod local;

// Re-export commonly used types
pub use config::LocalLlmConfig;
pub use error::{LlmError, Result};
pub use local::OllamaClient;
