//! Uniform success/error wrapper for executed operations.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Success(Value),
    Failure(String),
}

/// Result of one executed (or refused) operation.
///
/// Exactly one of data and error is populated; the constructors are the
/// only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    outcome: Outcome,
    timestamp: DateTime<Utc>,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            outcome: Outcome::Success(data),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure(error.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success(data) => Some(data),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_result(self) -> Result<Value, String> {
        match self.outcome {
            Outcome::Success(data) => Ok(data),
            Outcome::Failure(error) => Err(error),
        }
    }

    /// JSON without the timestamp, for deterministic prompt rendering.
    pub fn to_prompt_json(&self) -> String {
        let view = match &self.outcome {
            Outcome::Success(data) => serde_json::json!({"success": true, "data": data}),
            Outcome::Failure(error) => serde_json::json!({"success": false, "error": error}),
        };
        view.to_string()
    }
}

#[derive(Serialize)]
struct EnvelopeView<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    timestamp: String,
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EnvelopeView {
            success: self.is_success(),
            data: self.data(),
            error: self.error(),
            timestamp: self.timestamp.to_rfc3339(),
        }
        .serialize(serializer)
    }
}
