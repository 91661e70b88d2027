//! # chirp
//!
//! Talk to your X account in plain language. Each line you type is turned
//! into one API request by a local model, validated, executed and shown
//! together with the raw response.
//!
//! ## Features
//!
//! - **Local model** - Ollama (`hermes3` by default), nothing leaves the machine
//!   except the API call itself
//! - **Checked requests** - model output is validated before anything is sent
//! - **Conversation memory** - "like it" and "his last tweets" resolve against
//!   earlier turns
//! - **Dual-location config** - `~/.chirp/chirp.toml` and `./.chirp/chirp.toml`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chirp::config::{load_config, CliOverrides};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config(None, &CliOverrides::default()).await?;
//! let mut session = chirp::app::build_session(&config)?;
//!
//! let report = session.translate_and_execute("show me @rustlang's profile").await;
//! println!("{}", chirp::output::render_turn(&report, session.identities().len())?);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod health;
pub mod output;
pub mod repl;

pub use config::{ChirpConfig, CliOverrides, ConfigLoader};
pub use error::{ChirpError, ConfigError, Result};
