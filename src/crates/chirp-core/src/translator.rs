//! Translator: the bounded state machine from utterance to validated request.
//!
//! ```text
//! Building -> Invoking -> Parsing -> Validating -> Accepted
//!    ^           |           |           |
//!    +-----------+-----------+-----------+  (attempt < max_attempts)
//!                            |
//!                            v
//!                         Failed            (attempt == max_attempts)
//! ```
//!
//! Every failure, whether the model was unreachable, answered with
//! unparseable text, or produced a request the validator rejected, consumes
//! one attempt. The attempt counter increases once per prompt built, so at
//! most `max_attempts` model calls are made per utterance.

use crate::context::ConversationContext;
use crate::error::{AttemptError, TranslationFailure};
use crate::llm::LlmClient;
use crate::parser::parse_candidate;
use crate::prompt::PromptBuilder;
use crate::registry::OperationRegistry;
use crate::request::{ApiRequest, CandidateRequest};
use crate::validator::RequestValidator;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Translator configuration.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Hard ceiling on model calls per utterance (minimum 1).
    pub max_attempts: u32,

    /// Pause before retrying after the model could not be reached.
    pub retry_delay: Duration,

    /// Prior turns rendered into each prompt.
    pub prompt_turns: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            prompt_turns: crate::prompt::DEFAULT_PROMPT_TURNS,
        }
    }
}

impl TranslatorConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_prompt_turns(mut self, turns: usize) -> Self {
        self.prompt_turns = turns;
        self
    }
}

/// A successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub request: ApiRequest,
    pub attempts: u32,
}

/// States of one translation.
#[derive(Debug)]
enum State {
    Building { feedback: Option<AttemptError> },
    Invoking { prompt: String },
    Parsing { raw: String },
    Validating { candidate: CandidateRequest },
    Accepted(ApiRequest),
    Failed(AttemptError),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Building { .. } => "building",
            State::Invoking { .. } => "invoking",
            State::Parsing { .. } => "parsing",
            State::Validating { .. } => "validating",
            State::Accepted(_) => "accepted",
            State::Failed(_) => "failed",
        }
    }
}

/// Turns utterances into validated requests using a language model.
pub struct Translator<L> {
    llm: L,
    prompts: PromptBuilder,
    validator: RequestValidator,
    config: TranslatorConfig,
}

impl<L: LlmClient> Translator<L> {
    pub fn new(llm: L, registry: OperationRegistry, config: TranslatorConfig) -> Self {
        let prompts = PromptBuilder::new(registry.clone()).with_max_turns(config.prompt_turns);
        Self {
            llm,
            prompts,
            validator: RequestValidator::new(registry),
            config,
        }
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn registry(&self) -> &OperationRegistry {
        self.validator.registry()
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one utterance, given the conversation so far.
    pub async fn translate(
        &self,
        utterance: &str,
        context: &ConversationContext,
    ) -> Result<Translation, TranslationFailure> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt: u32 = 0;
        let mut state = State::Building { feedback: None };

        loop {
            debug!(state = state.name(), attempt, "Translator transition");
            state = match state {
                State::Building { feedback } => {
                    attempt += 1;
                    let prompt = self.prompts.build(context, utterance, feedback.as_ref());
                    State::Invoking { prompt }
                }
                State::Invoking { prompt } => match self.llm.invoke(&prompt).await {
                    Ok(raw) => State::Parsing { raw },
                    Err(e) => {
                        let next = self.after_failure(attempt, max_attempts, e.into());
                        if matches!(next, State::Building { .. }) && !self.config.retry_delay.is_zero() {
                            tokio::time::sleep(self.config.retry_delay).await;
                        }
                        next
                    }
                },
                State::Parsing { raw } => match parse_candidate(&raw) {
                    Ok(candidate) => State::Validating { candidate },
                    Err(e) => self.after_failure(attempt, max_attempts, e),
                },
                State::Validating { candidate } => match self.validator.validate(&candidate) {
                    Ok(request) => State::Accepted(request),
                    Err(e) => self.after_failure(attempt, max_attempts, e.into()),
                },
                State::Accepted(request) => {
                    info!(
                        operation = %request.operation(),
                        attempts = attempt,
                        "Utterance translated"
                    );
                    return Ok(Translation {
                        request,
                        attempts: attempt,
                    });
                }
                State::Failed(last_error) => {
                    warn!(
                        attempts = attempt,
                        error = %last_error,
                        "Translation failed, attempts exhausted"
                    );
                    return Err(TranslationFailure {
                        attempts: attempt,
                        last_error,
                    });
                }
            };
        }
    }

    fn after_failure(&self, attempt: u32, max_attempts: u32, error: AttemptError) -> State {
        if attempt >= max_attempts {
            State::Failed(error)
        } else {
            warn!(
                attempt,
                max_attempts,
                kind = error.kind(),
                error = %error,
                "Translation attempt failed, will retry"
            );
            State::Building {
                feedback: Some(error),
            }
        }
    }
}
