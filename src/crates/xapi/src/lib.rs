//! X (Twitter) v2 transport for chirp.
//!
//! Provides [`XApiClient`], the `SocialApi` implementation the dispatcher
//! talks to. HTTP statuses are mapped onto the `ApiError` kinds so a rate
//! limit or missing account shows up as such in the response envelope.
//!
//! ```rust,ignore
//! use xapi::{XApiClient, XApiConfig};
//!
//! let client = XApiClient::new(XApiConfig::new(std::env::var("X_BEARER_TOKEN")?))?;
//! let dispatcher = chirp_core::Dispatcher::new(client);
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::XApiClient;
pub use config::XApiConfig;
pub use error::{Result, XApiError};
