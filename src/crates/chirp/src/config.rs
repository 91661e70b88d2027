//! Configuration management for chirp
//!
//! Supports dual-location configuration:
//! - User-level: ~/.chirp/chirp.toml
//! - Project-level: ./.chirp/chirp.toml
//!
//! Project-level config overrides user-level config.

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{ApiConfig, ChirpConfig, CliOverrides, LlmConfig, LoggingConfig, SessionConfig};

use crate::error::ConfigError;
use std::path::PathBuf;

/// Load configuration from every location, then apply command line overrides
///
/// Priority order:
/// 1. Default values
/// 2. User-level config (~/.chirp/chirp.toml)
/// 3. Project-level config (./.chirp/chirp.toml)
/// 4. `explicit` file, if given
/// 5. Command line overrides
pub async fn load_config(
    explicit: Option<PathBuf>,
    overrides: &CliOverrides,
) -> Result<ChirpConfig, ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = explicit {
        loader = loader.with_explicit(path);
    }

    let mut config = loader.load().await?;
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}
