//! # chirp-core
//!
//! Turns natural-language requests into validated social media API calls.
//!
//! A local language model translates each utterance into a JSON request.
//! The output is treated as untrusted input: it is parsed, checked against a
//! closed operation registry, and retried with corrective feedback up to a
//! fixed bound. Accepted requests are dispatched to the platform and the
//! result is recorded in a bounded conversation context so later turns can
//! refer back to it ("like it", "the last tweet").
//!
//! ```text
//! utterance -> PromptBuilder (+context) -> LlmClient -> parse -> validate
//!           -> ApiRequest -> Dispatcher (+IdentityCache) -> ResponseEnvelope
//!           -> context
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use chirp_core::{
//!     ConversationContext, Dispatcher, OperationRegistry, Session, Translator,
//!     TranslatorConfig,
//! };
//!
//! let translator = Translator::new(llm, OperationRegistry::standard(), TranslatorConfig::default());
//! let mut session = Session::new(translator, Dispatcher::new(api), ConversationContext::default());
//!
//! let report = session.translate_and_execute("show me @rustlang's profile").await;
//! println!("{}", serde_json::to_string_pretty(&report.envelope)?);
//! ```

pub mod api;
pub mod context;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod request;
pub mod session;
pub mod translator;
pub mod validator;

pub use api::{AccountId, ApiError, ApiResult, PostDraft, SocialApi};
pub use context::{ConversationContext, ConversationTurn};
pub use dispatcher::Dispatcher;
pub use envelope::ResponseEnvelope;
pub use error::{AttemptError, TranslationFailure, ValidationError};
pub use identity::{CachedIdentity, IdentityCache};
pub use llm::{AdapterError, LlmClient};
pub use parser::parse_candidate;
pub use prompt::PromptBuilder;
pub use registry::{Operation, OperationRegistry, OperationSpec, ParamSpec, ParamType, Requirement, ResultShape};
pub use request::{ApiRequest, CandidateRequest, Handle, TweetId};
pub use session::{Session, TurnReport};
pub use translator::{Translation, Translator, TranslatorConfig};
pub use validator::RequestValidator;
