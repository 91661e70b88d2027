//! Request validator.
//!
//! Turns an untrusted [`CandidateRequest`] into an [`ApiRequest`] or a
//! [`ValidationError`]. Checks run in a fixed order: operation, required
//! parameters, undeclared parameters, type coercion, range constraints.
//! Out-of-range values are rejected, never clamped.

use crate::error::ValidationError;
use crate::registry::{Operation, OperationRegistry, OperationSpec, ParamSpec, ParamType, Requirement};
use crate::request::{ApiRequest, CandidateRequest, Handle, TweetId};
use serde_json::Value;
use std::collections::BTreeMap;

/// A parameter value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Coerced {
    Handle(Handle),
    Text(String),
    TweetId(TweetId),
    Int(i64),
}

/// Validates candidates against an operation registry.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    registry: OperationRegistry,
}

impl RequestValidator {
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Validate a candidate request.
    pub fn validate(&self, candidate: &CandidateRequest) -> Result<ApiRequest, ValidationError> {
        // 1. Operation
        let spec = self.registry.lookup(&candidate.operation).ok_or_else(|| {
            ValidationError::UnknownOperation {
                name: candidate.operation.clone(),
                available: self.registry.names(),
            }
        })?;

        // 2. Required parameters
        for param in spec.required() {
            let present = candidate
                .params
                .get(param.name)
                .is_some_and(|v| !v.is_null());
            if !present {
                return Err(ValidationError::MissingParameter {
                    operation: spec.name(),
                    name: param.name,
                });
            }
        }

        // 3. Undeclared parameters
        let mut declared = Vec::with_capacity(candidate.params.len());
        for (name, value) in &candidate.params {
            let param = spec
                .param(name)
                .ok_or_else(|| ValidationError::UnknownParameter {
                    operation: spec.name(),
                    name: name.clone(),
                })?;
            if !value.is_null() {
                declared.push((param, value));
            }
        }

        // 4. Coercion
        let mut coerced = Vec::with_capacity(declared.len());
        for (param, value) in declared {
            coerced.push((param, coerce(param, value)?));
        }

        // 5. Ranges
        let mut typed = BTreeMap::new();
        for (param, value) in coerced {
            check_range(param, &value)?;
            typed.insert(param.name, value);
        }

        assemble(spec, TypedParams { spec, values: typed })
    }
}

fn coerce(param: &ParamSpec, value: &Value) -> Result<Coerced, ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        name: param.name,
        expected: expected_description(param.ty),
        got: describe_value(value),
    };

    match param.ty {
        ParamType::Handle => value
            .as_str()
            .and_then(Handle::parse)
            .map(Coerced::Handle)
            .ok_or_else(mismatch),
        ParamType::Text { .. } => value
            .as_str()
            .map(|s| Coerced::Text(s.to_string()))
            .ok_or_else(mismatch),
        ParamType::TweetId => match value {
            Value::String(s) => TweetId::parse(s).map(Coerced::TweetId).ok_or_else(mismatch),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| TweetId::parse(&n.to_string()))
                .map(Coerced::TweetId)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamType::Limit { min, max } => {
            // Integers too wide for i64 are still integers, just out of range.
            let too_large = |value: String| ValidationError::OutOfRange {
                name: param.name,
                value,
                bound: format!("{}..={}", min, max),
            };
            match value {
                Value::Number(n) => {
                    if let Some(n) = n.as_i64() {
                        return Ok(Coerced::Int(n));
                    }
                    if n.is_u64() {
                        return Err(too_large(n.to_string()));
                    }
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(Coerced::Int(f as i64)),
                        Some(f) if f.is_finite() && f.fract() == 0.0 => Err(too_large(n.to_string())),
                        _ => Err(mismatch()),
                    }
                }
                Value::String(s) => {
                    let s = s.trim();
                    match s.parse::<i64>() {
                        Ok(n) => Ok(Coerced::Int(n)),
                        Err(_) if is_integer_literal(s) => Err(too_large(s.to_string())),
                        Err(_) => Err(mismatch()),
                    }
                }
                _ => Err(mismatch()),
            }
        }
    }
}

/// An optionally signed run of ASCII digits.
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn check_range(param: &ParamSpec, value: &Coerced) -> Result<(), ValidationError> {
    match (param.ty, value) {
        (ParamType::Limit { min, max }, Coerced::Int(n)) => {
            if *n < i64::from(min) || *n > i64::from(max) {
                return Err(ValidationError::OutOfRange {
                    name: param.name,
                    value: n.to_string(),
                    bound: format!("{}..={}", min, max),
                });
            }
        }
        (ParamType::Text { max_chars }, Coerced::Text(text)) => {
            let len = text.trim().chars().count();
            if len == 0 || len > max_chars {
                return Err(ValidationError::OutOfRange {
                    name: param.name,
                    value: format!("of {} characters", len),
                    bound: format!("1..={} characters", max_chars),
                });
            }
        }
        _ => {}
    }
    Ok(())
}

fn expected_description(ty: ParamType) -> &'static str {
    match ty {
        ParamType::Handle => "an account handle (letters, digits, underscores)",
        ParamType::Text { .. } => "a string",
        ParamType::TweetId => "a numeric post id",
        ParamType::Limit { .. } => "an integer",
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => {
            let preview: String = s.chars().take(40).collect();
            if preview.len() < s.len() {
                format!("string \"{}...\"", preview)
            } else {
                format!("string \"{}\"", preview)
            }
        }
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// Coerced, range-checked parameters of one operation.
struct TypedParams {
    spec: &'static OperationSpec,
    values: BTreeMap<&'static str, Coerced>,
}

impl TypedParams {
    fn missing(&self, name: &'static str) -> ValidationError {
        ValidationError::MissingParameter {
            operation: self.spec.name(),
            name,
        }
    }

    fn handle(&mut self, name: &'static str) -> Result<Handle, ValidationError> {
        match self.values.remove(name) {
            Some(Coerced::Handle(handle)) => Ok(handle),
            _ => Err(self.missing(name)),
        }
    }

    fn text(&mut self, name: &'static str) -> Result<String, ValidationError> {
        self.optional_text(name)
            .and_then(|t| t.ok_or_else(|| self.missing(name)))
    }

    fn optional_text(&mut self, name: &'static str) -> Result<Option<String>, ValidationError> {
        match self.values.remove(name) {
            Some(Coerced::Text(text)) => Ok(Some(text)),
            None => Ok(None),
            Some(_) => Err(self.missing(name)),
        }
    }

    fn tweet_id(&mut self, name: &'static str) -> Result<TweetId, ValidationError> {
        self.optional_tweet_id(name)
            .and_then(|t| t.ok_or_else(|| self.missing(name)))
    }

    fn optional_tweet_id(&mut self, name: &'static str) -> Result<Option<TweetId>, ValidationError> {
        match self.values.remove(name) {
            Some(Coerced::TweetId(id)) => Ok(Some(id)),
            None => Ok(None),
            Some(_) => Err(self.missing(name)),
        }
    }

    /// Limit value, falling back to the declared default.
    fn limit(&mut self, name: &'static str) -> Result<u32, ValidationError> {
        let default = match self.spec.param(name).map(|p| p.requirement) {
            Some(Requirement::Default(default)) => Some(default),
            _ => None,
        };
        match self.values.remove(name) {
            Some(Coerced::Int(n)) => u32::try_from(n).map_err(|_| ValidationError::OutOfRange {
                name,
                value: n.to_string(),
                bound: format!("0..={}", u32::MAX),
            }),
            None => default.ok_or_else(|| self.missing(name)),
            Some(_) => Err(self.missing(name)),
        }
    }
}

fn assemble(
    spec: &'static OperationSpec,
    mut p: TypedParams,
) -> Result<ApiRequest, ValidationError> {
    let request = match spec.operation {
        Operation::Profile => ApiRequest::Profile {
            username: p.handle("username")?,
        },
        Operation::Tweets => ApiRequest::Tweets {
            username: p.handle("username")?,
            limit: p.limit("limit")?,
        },
        Operation::Search => ApiRequest::Search {
            query: p.text("query")?,
            limit: p.limit("limit")?,
        },
        Operation::Post => ApiRequest::Post {
            text: p.text("text")?,
            media_path: p.optional_text("media_path")?,
            reply_to_id: p.optional_tweet_id("reply_to_id")?,
        },
        Operation::Like => ApiRequest::Like {
            tweet_id: p.tweet_id("tweet_id")?,
        },
        Operation::Unlike => ApiRequest::Unlike {
            tweet_id: p.tweet_id("tweet_id")?,
        },
        Operation::Timeline => ApiRequest::Timeline {
            limit: p.limit("limit")?,
        },
        Operation::Delete => ApiRequest::Delete {
            tweet_id: p.tweet_id("tweet_id")?,
        },
    };
    Ok(request)
}
