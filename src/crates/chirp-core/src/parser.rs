//! Structural parsing of raw model output into a candidate request.
//!
//! Model text is untrusted. The parser only checks shape: one JSON object
//! with a string `operation` and an optional `params` object. Semantic
//! checks belong to the validator.

use crate::error::AttemptError;
use crate::request::CandidateRequest;
use serde_json::{Map, Value};
use tracing::debug;

/// Parse raw model text into a candidate request.
pub fn parse_candidate(raw: &str) -> Result<CandidateRequest, AttemptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty response"));
    }

    let json = extract_json(trimmed).ok_or_else(|| malformed("no JSON object found"))?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let mut object = match value {
        Value::Object(object) => object,
        Value::Array(items) if items.len() == 1 => match items.into_iter().next() {
            Some(Value::Object(object)) => object,
            _ => return Err(malformed("expected a JSON object")),
        },
        Value::Array(_) => return Err(malformed("expected exactly one request, got a list")),
        _ => return Err(malformed("expected a JSON object")),
    };

    let operation = match object.remove("operation") {
        Some(Value::String(name)) => name,
        Some(_) => return Err(malformed("'operation' must be a string")),
        None => return Err(malformed("missing 'operation' field")),
    };

    let params = match object.remove("params") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(params)) => params,
        Some(_) => return Err(malformed("'params' must be a JSON object")),
    };

    if !object.is_empty() {
        let ignored: Vec<&str> = object.keys().map(String::as_str).collect();
        debug!(?ignored, "Ignoring extra top-level keys in model output");
    }

    Ok(CandidateRequest::new(operation, params))
}

fn malformed(detail: impl Into<String>) -> AttemptError {
    AttemptError::MalformedOutput(detail.into())
}

/// Locate the JSON payload in text that may carry markdown fences or prose.
fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + 7..];
        if let Some(end) = body.find("```") {
            return Some(body[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let body = &text[start + 3..];
        if let Some(end) = body.find("```") {
            let content = body[..end].trim();
            if content.starts_with('{') || content.starts_with('[') {
                return Some(content);
            }
        }
    }

    if text.starts_with('[') && serde_json::from_str::<Value>(text).is_ok_and(|v| v.is_array()) {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_object() {
        let candidate =
            parse_candidate(r#"{"operation": "profile", "params": {"username": "alice"}}"#)
                .unwrap();
        assert_eq!(candidate.operation, "profile");
        assert_eq!(candidate.params["username"], json!("alice"));
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let text = "Here is the request:\n```json\n{\"operation\": \"timeline\", \"params\": {}}\n```\nDone.";
        let candidate = parse_candidate(text).unwrap();
        assert_eq!(candidate.operation, "timeline");
        assert!(candidate.params.is_empty());
    }

    #[test]
    fn test_parse_object_embedded_in_prose() {
        let text = r#"Sure! {"operation": "search", "params": {"query": "rust"}} hope that helps"#;
        assert_eq!(parse_candidate(text).unwrap().operation, "search");
    }

    #[test]
    fn test_missing_params_is_empty_map() {
        let candidate = parse_candidate(r#"{"operation": "timeline"}"#).unwrap();
        assert!(candidate.params.is_empty());
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let candidate = parse_candidate(
            r#"{"operation": "like", "params": {"tweet_id": "1"}, "reason": "user asked"}"#,
        )
        .unwrap();
        assert_eq!(candidate.operation, "like");
        assert_eq!(candidate.params.len(), 1);
    }

    #[test]
    fn test_rejects_prose() {
        let err = parse_candidate("I think you want to see Alice's profile.").unwrap_err();
        assert!(matches!(err, AttemptError::MalformedOutput(_)));
    }

    #[test]
    fn test_rejects_truncated_json() {
        let err = parse_candidate(r#"{"operation": "profile", "params": {"username": "#)
            .unwrap_err();
        assert!(matches!(err, AttemptError::MalformedOutput(_)));
    }

    #[test]
    fn test_rejects_non_string_operation() {
        let err = parse_candidate(r#"{"operation": 3, "params": {}}"#).unwrap_err();
        assert_eq!(
            err,
            AttemptError::MalformedOutput("'operation' must be a string".to_string())
        );
    }

    #[test]
    fn test_rejects_non_object_params() {
        let err = parse_candidate(r#"{"operation": "post", "params": ["hi"]}"#).unwrap_err();
        assert!(matches!(err, AttemptError::MalformedOutput(_)));
    }

    #[test]
    fn test_rejects_multiple_requests() {
        let text = r#"[{"operation": "like", "params": {"tweet_id": "1"}}, {"operation": "like", "params": {"tweet_id": "2"}}]"#;
        let err = parse_candidate(text).unwrap_err();
        assert_eq!(
            err,
            AttemptError::MalformedOutput("expected exactly one request, got a list".to_string())
        );
    }

    #[test]
    fn test_single_element_list_is_accepted() {
        let text = r#"[{"operation": "like", "params": {"tweet_id": "1"}}]"#;
        assert_eq!(parse_candidate(text).unwrap().operation, "like");
    }

    #[test]
    fn test_bracketed_prose_before_object() {
        let text = r#"[note] {"operation": "timeline", "params": {}}"#;
        let candidate = parse_candidate(text).unwrap();
        assert_eq!(candidate.operation, "timeline");
        assert!(candidate.params.is_empty());
    }
}
