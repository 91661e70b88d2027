//! Bounded conversation history.

use crate::envelope::ResponseEnvelope;
use crate::request::ApiRequest;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of turns retained per session.
pub const DEFAULT_CAPACITY: usize = 20;

/// One utterance with the request it became and the response it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub utterance: String,
    /// `None` when translation failed.
    pub request: Option<ApiRequest>,
    /// `None` when nothing was executed.
    pub response: Option<ResponseEnvelope>,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        utterance: impl Into<String>,
        request: Option<ApiRequest>,
        response: Option<ResponseEnvelope>,
    ) -> Self {
        Self {
            utterance: utterance.into(),
            request,
            response,
            at: Utc::now(),
        }
    }
}

/// Ordered log of the most recent turns. Oldest turns are evicted first.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
}

impl ConversationContext {
    /// Create a context holding at most `capacity` turns (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, returning the evicted turn if the context was full.
    pub fn push(&mut self, turn: ConversationTurn) -> Option<ConversationTurn> {
        let evicted = if self.turns.len() == self.capacity {
            self.turns.pop_front()
        } else {
            None
        };
        self.turns.push_back(turn);
        evicted
    }

    /// The last `k` turns, oldest first.
    pub fn recent(&self, k: usize) -> impl Iterator<Item = &ConversationTurn> {
        let skip = self.turns.len().saturating_sub(k);
        self.turns.iter().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
