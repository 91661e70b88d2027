//! Prompt construction.
//!
//! The prompt embeds the full operation catalogue so the model has a closed
//! target grammar, the most recent turns for reference resolution ("it",
//! "that tweet"), the new utterance, and on retries the reason the previous
//! answer was rejected. Output is a pure function of the inputs.

use crate::context::{ConversationContext, ConversationTurn};
use crate::error::AttemptError;
use crate::registry::{OperationRegistry, ParamSpec, Requirement};
use std::fmt::Write;

/// Default number of prior turns rendered into the prompt.
pub const DEFAULT_PROMPT_TURNS: usize = 5;
/// Default character budget for one rendered result.
pub const DEFAULT_RESULT_CHARS: usize = 1500;

/// Builds the text sent to the model.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    registry: OperationRegistry,
    max_turns: usize,
    result_chars: usize,
}

impl PromptBuilder {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry,
            max_turns: DEFAULT_PROMPT_TURNS,
            result_chars: DEFAULT_RESULT_CHARS,
        }
    }

    /// Number of prior turns to include.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Character budget for each rendered result.
    pub fn with_result_chars(mut self, result_chars: usize) -> Self {
        self.result_chars = result_chars;
        self
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Build the prompt for one attempt.
    pub fn build(
        &self,
        context: &ConversationContext,
        utterance: &str,
        previous_error: Option<&AttemptError>,
    ) -> String {
        let mut prompt = String::with_capacity(2048);

        prompt.push_str(
            "You convert requests about a social media account into exactly one API request.\n\n",
        );
        self.write_catalogue(&mut prompt);
        self.write_contract(&mut prompt);
        self.write_history(&mut prompt, context);

        let _ = write!(prompt, "\nNew request:\nUser: {}\n", utterance.trim());

        if let Some(error) = previous_error.filter(|e| e.is_model_feedback()) {
            let _ = write!(
                prompt,
                "\nYour previous answer was rejected: {}\nAnswer again with a corrected request.\n",
                error
            );
        }

        prompt.push_str("\nJSON:\n");
        prompt
    }

    fn write_catalogue(&self, out: &mut String) {
        out.push_str("Available operations:\n");
        for spec in self.registry.specs() {
            let _ = writeln!(out, "- {}: {}", spec.name(), spec.description);
            if spec.params.is_empty() {
                out.push_str("    (no parameters)\n");
            }
            for param in spec.params {
                let _ = writeln!(out, "    {}", describe_param(param));
            }
        }
        out.push('\n');
    }

    fn write_contract(&self, out: &mut String) {
        out.push_str(
            "Answer with a single JSON object and nothing else, in the form\n\
             {\"operation\": \"<name>\", \"params\": {<parameters>}}\n\
             Use only the operations and parameters listed above. Omit optional \
             parameters you do not need.\n\
             Example: for \"show me the last 5 posts from @rustlang\" answer\n\
             {\"operation\": \"tweets\", \"params\": {\"username\": \"rustlang\", \"limit\": 5}}\n\
             If the request refers to earlier results (\"it\", \"that post\", \"the last \
             one\"), take ids and names from the conversation below.\n",
        );
    }

    fn write_history(&self, out: &mut String, context: &ConversationContext) {
        if self.max_turns == 0 || context.is_empty() {
            return;
        }
        out.push_str("\nConversation so far (oldest first):\n");
        for turn in context.recent(self.max_turns) {
            self.write_turn(out, turn);
        }
    }

    fn write_turn(&self, out: &mut String, turn: &ConversationTurn) {
        let _ = writeln!(out, "User: {}", turn.utterance.trim());
        match &turn.request {
            Some(request) => {
                let _ = writeln!(out, "Request: {}", request.to_json());
            }
            None => out.push_str("Request: (not understood)\n"),
        }
        if let Some(response) = &turn.response {
            let rendered = truncate_chars(&response.to_prompt_json(), self.result_chars);
            let _ = writeln!(out, "Result: {}", rendered);
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(OperationRegistry::standard())
    }
}

fn describe_param(param: &ParamSpec) -> String {
    let presence = match param.requirement {
        Requirement::Required => "required".to_string(),
        Requirement::Optional => "optional".to_string(),
        Requirement::Default(default) => format!("optional, default {}", default),
    };
    format!(
        "{} ({}, {}): {}",
        param.name,
        param.ty.type_name(),
        presence,
        param.ty.constraint()
    )
}

/// Cut `text` to at most `max` characters, marking the cut.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...(truncated)", &text[..idx]),
        None => text.to_string(),
    }
}
