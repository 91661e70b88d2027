//! One interactive session: translator, dispatcher, identity cache and
//! conversation context, owned together and never shared.

use crate::api::SocialApi;
use crate::context::{ConversationContext, ConversationTurn};
use crate::dispatcher::Dispatcher;
use crate::envelope::ResponseEnvelope;
use crate::identity::IdentityCache;
use crate::llm::LlmClient;
use crate::request::ApiRequest;
use crate::translator::Translator;
use tracing::{debug, info_span, Instrument};

/// What happened in one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The accepted request, if translation succeeded.
    pub request: Option<ApiRequest>,
    /// The operation's result, or the translation failure.
    pub envelope: ResponseEnvelope,
    /// Model calls spent on translation.
    pub attempts: u32,
}

impl TurnReport {
    pub fn was_understood(&self) -> bool {
        self.request.is_some()
    }
}

/// A single-user session processing one turn at a time.
pub struct Session<L, A> {
    translator: Translator<L>,
    dispatcher: Dispatcher<A>,
    identities: IdentityCache,
    context: ConversationContext,
}

impl<L: LlmClient, A: SocialApi> Session<L, A> {
    pub fn new(translator: Translator<L>, dispatcher: Dispatcher<A>, context: ConversationContext) -> Self {
        Self {
            translator,
            dispatcher,
            identities: IdentityCache::new(),
            context,
        }
    }

    /// Translate an utterance, execute it if understood, and record the turn.
    ///
    /// The dispatcher is only reached once translation has been accepted, so
    /// dropping this future mid-translation never executes a partial request.
    pub async fn translate_and_execute(&mut self, utterance: &str) -> TurnReport {
        let span = info_span!("turn", turn = self.context.len() + 1);
        async move {
            match self.translator.translate(utterance, &self.context).await {
                Ok(translation) => {
                    let envelope = self
                        .dispatcher
                        .execute(&translation.request, &mut self.identities)
                        .await;
                    self.record(ConversationTurn::new(
                        utterance,
                        Some(translation.request.clone()),
                        Some(envelope.clone()),
                    ));
                    TurnReport {
                        request: Some(translation.request),
                        envelope,
                        attempts: translation.attempts,
                    }
                }
                Err(failure) => {
                    self.record(ConversationTurn::new(utterance, None, None));
                    TurnReport {
                        request: None,
                        envelope: ResponseEnvelope::failure(failure.to_string()),
                        attempts: failure.attempts,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    fn record(&mut self, turn: ConversationTurn) {
        if let Some(evicted) = self.context.push(turn) {
            debug!(utterance = %evicted.utterance, "Evicted oldest turn from context");
        }
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn identities(&self) -> &IdentityCache {
        &self.identities
    }

    pub fn translator(&self) -> &Translator<L> {
        &self.translator
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }
}
