//! Decoding of the AI webhooks' loosely shaped replies.
//!
//! The workflow behind the webhooks has answered in several shapes over
//! time. Each known envelope has its own extractor, tried in a fixed order;
//! the first payload that an interpreter recognises wins:
//!
//! 1. an object whose `output` holds the payload (usually JSON text, often
//!    inside a markdown code fence)
//! 2. an array whose first element is such an object
//! 3. the payload itself, as a JSON object or a JSON string containing one
//! 4. the first balanced `{...}` span anywhere in the text
//!
//! Enhancement payloads come in two shapes. The legacy one lists
//! `suggestions` with a free-text `reason`; the current one lists
//! `fieldEvaluations` carrying a `sufficient`/`insufficient` status. Both end
//! up as [`FieldEvaluation`]s.

use serde::Deserialize;
use serde_json::{Map, Value};
use shared::{EnhancementResult, EvaluationStatus, FieldEvaluation, NarrativeField};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected {0}")]
    Envelope(&'static str),

    #[error("no JSON object found in the response text")]
    NoObject,

    #[error("unrecognised payload shape")]
    UnknownShape,

    /// The service answered with `{"status": "error", "message": ...}`
    #[error("{0}")]
    ServiceReported(String),

    #[error("Could not parse AI response")]
    Unparseable,
}

type Extractor = fn(&str, Option<&Value>) -> Result<Value, DecodeError>;

const EXTRACTORS: [(&str, Extractor); 4] = [
    ("wrapped object", from_wrapped_object),
    ("wrapped array", from_wrapped_array),
    ("raw json", from_raw_json),
    ("balanced braces", from_balanced_braces),
];

/// Decode an enhancement webhook reply
pub fn decode_enhancement(body: &str) -> Result<EnhancementResult, DecodeError> {
    decode_with(body, interpret_enhancement)
}

/// Decode a memo webhook reply. A body that is not JSON at all is taken as the memo text.
pub fn decode_memo(body: &str) -> Result<String, DecodeError> {
    match decode_with(body, interpret_memo) {
        Err(DecodeError::Unparseable) => {
            let text = body.trim();
            if text.is_empty() || text.starts_with('{') || text.starts_with('[') {
                Err(DecodeError::Unparseable)
            } else {
                Ok(text.to_string())
            }
        }
        other => other,
    }
}

fn decode_with<T>(body: &str, interpret: fn(&Value) -> Result<T, DecodeError>) -> Result<T, DecodeError> {
    let parsed: Option<Value> = serde_json::from_str(body.trim()).ok();

    for (name, extract) in EXTRACTORS {
        match extract(body, parsed.as_ref()).and_then(|payload| interpret(&payload)) {
            Ok(decoded) => {
                debug!(decoder = name, "Decoded AI response");
                return Ok(decoded);
            }
            Err(DecodeError::ServiceReported(message)) => return Err(DecodeError::ServiceReported(message)),
            Err(e) => debug!(decoder = name, error = %e, "Decoder did not match"),
        }
    }

    Err(DecodeError::Unparseable)
}

fn from_wrapped_object(_body: &str, parsed: Option<&Value>) -> Result<Value, DecodeError> {
    match parsed {
        Some(Value::Object(map)) => map
            .get("output")
            .map(output_payload)
            .ok_or(DecodeError::Envelope("an object with an `output` field")),
        _ => Err(DecodeError::Envelope("a JSON object")),
    }
}

fn from_wrapped_array(_body: &str, parsed: Option<&Value>) -> Result<Value, DecodeError> {
    match parsed {
        Some(Value::Array(items)) => match items.first() {
            Some(Value::Object(first)) => first
                .get("output")
                .map(output_payload)
                .ok_or(DecodeError::Envelope("an array whose first element has `output`")),
            _ => Err(DecodeError::Envelope("an array of objects")),
        },
        _ => Err(DecodeError::Envelope("a JSON array")),
    }
}

fn from_raw_json(_body: &str, parsed: Option<&Value>) -> Result<Value, DecodeError> {
    match parsed {
        Some(object @ Value::Object(_)) => Ok(object.clone()),
        Some(Value::String(text)) => Ok(embedded_payload(text)),
        _ => Err(DecodeError::Envelope("a JSON object or string")),
    }
}

fn from_balanced_braces(body: &str, _parsed: Option<&Value>) -> Result<Value, DecodeError> {
    first_balanced_object(body)
        .and_then(|span| serde_json::from_str(span).ok())
        .ok_or(DecodeError::NoObject)
}

fn output_payload(output: &Value) -> Value {
    match output {
        Value::String(text) => embedded_payload(text),
        other => other.clone(),
    }
}

/// JSON carried inside a string. Falls back to the first object in the text,
/// then to the text itself.
fn embedded_payload(text: &str) -> Value {
    let unfenced = strip_code_fence(text);
    match serde_json::from_str::<Value>(unfenced) {
        Ok(Value::String(inner)) if inner.trim_start().starts_with('{') => {
            serde_json::from_str(&inner).unwrap_or(Value::String(inner))
        }
        Ok(value) => value,
        Err(_) => first_balanced_object(unfenced)
            .and_then(|span| serde_json::from_str(span).ok())
            .unwrap_or_else(|| Value::String(unfenced.to_string())),
    }
}

/// Remove a surrounding markdown code fence such as three backticks plus `json`
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) up to the end of the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// The first `{...}` span whose braces balance, ignoring braces inside strings
pub(crate) fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_service_error(map: &Map<String, Value>) -> Result<(), DecodeError> {
    match map.get("status").and_then(Value::as_str) {
        Some(status) if status.eq_ignore_ascii_case("error") => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or("The AI service reported an error");
            Err(DecodeError::ServiceReported(message.to_string()))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    field: String,
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Clone, Copy)]
enum Shape {
    Legacy,
    Current,
}

fn evaluations(items: &[Value], shape: Shape) -> Vec<FieldEvaluation> {
    items
        .iter()
        .filter_map(|item| match RawEvaluation::deserialize(item) {
            Ok(raw) => to_evaluation(raw, shape),
            Err(e) => {
                debug!(error = %e, "Skipping malformed evaluation");
                None
            }
        })
        .collect()
}

fn to_evaluation(raw: RawEvaluation, shape: Shape) -> Option<FieldEvaluation> {
    let Some(field) = NarrativeField::from_api_name(&raw.field) else {
        debug!(field = %raw.field, "Dropping evaluation for unknown field");
        return None;
    };

    let status = match shape {
        Shape::Legacy => None,
        Shape::Current => raw.status.as_deref().and_then(parse_status),
    };
    let reason = match (raw.reason, status) {
        (Some(reason), _) if !reason.trim().is_empty() => reason,
        (_, Some(status)) => status.as_str().to_string(),
        _ => String::new(),
    };

    Some(FieldEvaluation {
        field,
        original: raw.original.unwrap_or_default(),
        suggestion: raw.suggestion.unwrap_or_default(),
        status,
        reason,
    })
}

fn parse_status(status: &str) -> Option<EvaluationStatus> {
    match status.trim().to_ascii_lowercase().as_str() {
        "sufficient" => Some(EvaluationStatus::Sufficient),
        "insufficient" => Some(EvaluationStatus::Insufficient),
        _ => None,
    }
}

fn parent_narrative(map: &Map<String, Value>) -> Option<String> {
    ["parentNarrative", "parent_narrative"]
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn interpret_enhancement(payload: &Value) -> Result<EnhancementResult, DecodeError> {
    match payload {
        // Some workflow versions emit the evaluation list on its own
        Value::Array(items) => Ok(EnhancementResult {
            evaluations: evaluations(items, Shape::Current),
            parent_narrative: None,
        }),
        Value::Object(map) => {
            check_service_error(map)?;
            let parent_narrative = parent_narrative(map);

            let evaluations = if let Some(Value::Array(items)) = map.get("fieldEvaluations") {
                evaluations(items, Shape::Current)
            } else if let Some(Value::Array(items)) = map.get("suggestions") {
                evaluations(items, Shape::Legacy)
            } else if parent_narrative.is_some() || map.get("status").and_then(Value::as_str) == Some("success") {
                Vec::new()
            } else {
                return Err(DecodeError::UnknownShape);
            };

            Ok(EnhancementResult { evaluations, parent_narrative })
        }
        _ => Err(DecodeError::Envelope("an object or array payload")),
    }
}

fn interpret_memo(payload: &Value) -> Result<String, DecodeError> {
    match payload {
        Value::Object(map) => {
            check_service_error(map)?;
            ["memo_content", "memo"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .find(|text| !text.is_empty())
                .map(str::to_string)
                .ok_or(DecodeError::UnknownShape)
        }
        Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(DecodeError::UnknownShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_payload() -> Value {
        json!({
            "fieldEvaluations": [
                {
                    "field": "incident_description",
                    "original": "x",
                    "suggestion": "Describe what Ava was doing when she fell.",
                    "status": "insufficient"
                },
                {
                    "field": "injury_description",
                    "original": "scraped knee",
                    "suggestion": "A small scrape on Ava's left knee.",
                    "status": "sufficient"
                }
            ],
            "parentNarrative": "Ava had a small tumble on the playground."
        })
    }

    #[test]
    fn test_fenced_output_matches_unfenced() {
        let payload = current_payload().to_string();
        let fenced = json!({ "output": format!("```json\n{}\n```", payload) }).to_string();
        let plain = json!({ "output": payload }).to_string();

        let from_fenced = decode_enhancement(&fenced).unwrap();
        let from_plain = decode_enhancement(&plain).unwrap();
        assert_eq!(from_fenced, from_plain);
        assert_eq!(from_fenced.evaluations.len(), 2);
    }

    #[test]
    fn test_array_envelope_matches_object_envelope() {
        let payload = current_payload().to_string();
        let in_array = json!([{ "output": payload }]).to_string();
        let in_object = json!({ "output": payload }).to_string();

        assert_eq!(decode_enhancement(&in_array).unwrap(), decode_enhancement(&in_object).unwrap());
    }

    #[test]
    fn test_current_shape_synthesizes_reason() {
        let result = decode_enhancement(&current_payload().to_string()).unwrap();

        let first = &result.evaluations[0];
        assert_eq!(first.field, NarrativeField::IncidentDescription);
        assert_eq!(first.status, Some(EvaluationStatus::Insufficient));
        assert_eq!(first.reason, "insufficient");
        assert!(first.is_insufficient());
        assert_eq!(result.parent_narrative.as_deref(), Some("Ava had a small tumble on the playground."));
    }

    #[test]
    fn test_legacy_suggestions_shape() {
        let body = json!({
            "status": "success",
            "suggestions": [{
                "field": "action_taken",
                "original": "bandaid",
                "suggestion": "Cleaned the scrape and applied a bandage.",
                "reason": "Says what first aid was given."
            }],
            "parent_narrative": "Ava scraped her knee."
        })
        .to_string();

        let result = decode_enhancement(&body).unwrap();
        assert_eq!(
            result.evaluations,
            vec![FieldEvaluation {
                field: NarrativeField::ActionTaken,
                original: "bandaid".to_string(),
                suggestion: "Cleaned the scrape and applied a bandage.".to_string(),
                status: None,
                reason: "Says what first aid was given.".to_string(),
            }]
        );
        assert_eq!(result.parent_narrative.as_deref(), Some("Ava scraped her knee."));
    }

    #[test]
    fn test_json_string_body_is_unwrapped() {
        let body = serde_json::to_string(&current_payload().to_string()).unwrap();
        assert_eq!(decode_enhancement(&body).unwrap().evaluations.len(), 2);
    }

    #[test]
    fn test_object_found_inside_prose() {
        let body = format!(
            "Here is my review {{not json}} ... actually: {} Hope that helps!",
            json!({ "suggestions": [{ "field": "injury_description", "suggestion": "Use {braces} carefully" }] })
        );
        // The first balanced span is "{not json}", which fails to parse
        assert_eq!(decode_enhancement(&body), Err(DecodeError::Unparseable));

        let body = format!(
            "Review follows: {} Hope that helps!",
            json!({ "suggestions": [{ "field": "injury_description", "suggestion": "Use {braces} carefully" }] })
        );
        let result = decode_enhancement(&body).unwrap();
        assert_eq!(result.evaluations[0].suggestion, "Use {braces} carefully");
    }

    #[test]
    fn test_bare_array_output() {
        let body = json!({
            "output": json!([{ "field": "action_taken", "suggestion": "Applied ice for five minutes.", "status": "sufficient" }]).to_string()
        })
        .to_string();

        let result = decode_enhancement(&body).unwrap();
        assert_eq!(result.evaluations.len(), 1);
        assert_eq!(result.evaluations[0].status, Some(EvaluationStatus::Sufficient));
        assert_eq!(result.parent_narrative, None);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let body = json!({
            "fieldEvaluations": [
                { "field": "location", "suggestion": "Say which room", "status": "insufficient" },
                { "field": "actionTaken", "suggestion": "Applied ice.", "status": "SUFFICIENT" },
                { "nonsense": true }
            ]
        })
        .to_string();

        let result = decode_enhancement(&body).unwrap();
        assert_eq!(result.evaluations.len(), 1);
        assert_eq!(result.evaluations[0].field, NarrativeField::ActionTaken);
        assert_eq!(result.evaluations[0].status, Some(EvaluationStatus::Sufficient));
    }

    #[test]
    fn test_service_error_is_reported() {
        let body = json!({ "status": "error", "message": "Model overloaded" }).to_string();
        assert_eq!(decode_enhancement(&body), Err(DecodeError::ServiceReported("Model overloaded".to_string())));
    }

    #[test]
    fn test_garbage_is_a_parse_failure_not_a_panic() {
        for body in ["", "   ", "<html>502 Bad Gateway</html>", "{\"output\": 42}", "[]", "{\"unrelated\": 1}", "{{{"] {
            let err = decode_enhancement(body).unwrap_err();
            assert_eq!(err, DecodeError::Unparseable, "body {body:?}");
            assert_eq!(err.to_string(), "Could not parse AI response");
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_first_balanced_object_respects_strings() {
        assert_eq!(first_balanced_object(r#"x {"a":"}"} y"#), Some(r#"{"a":"}"}"#));
        assert_eq!(first_balanced_object(r#"{"a":"\"}"}"#), Some(r#"{"a":"\"}"}"#));
        assert_eq!(first_balanced_object("{ unclosed"), None);
        assert_eq!(first_balanced_object("no braces"), None);
    }

    #[test]
    fn test_memo_shapes() {
        assert_eq!(decode_memo(&json!({ "memo_content": "Dear Parent" }).to_string()).unwrap(), "Dear Parent");
        assert_eq!(decode_memo(&json!({ "memo": "Dear Parent" }).to_string()).unwrap(), "Dear Parent");
        assert_eq!(decode_memo(&json!([{ "output": "Dear Parent" }]).to_string()).unwrap(), "Dear Parent");
        assert_eq!(
            decode_memo(&json!({ "output": "```json\n{\"memo_content\": \"Dear Parent\"}\n```" }).to_string()).unwrap(),
            "Dear Parent"
        );
        assert_eq!(decode_memo("Dear Parent/Guardian,\n\nAva had a fall.").unwrap(), "Dear Parent/Guardian,\n\nAva had a fall.");
        assert_eq!(decode_memo("{\"memo_content\": \"\"}"), Err(DecodeError::Unparseable));
        assert_eq!(
            decode_memo(&json!({ "status": "error", "message": "quota" }).to_string()),
            Err(DecodeError::ServiceReported("quota".to_string()))
        );
    }
}
