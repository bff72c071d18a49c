//! The request/response envelope carried between client and coordinator.
//!
//! Field names and optionality are the compatibility surface: the same JSON
//! shape works in-process and over a wire transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An action request addressed to the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Name of the action to invoke, matched case-sensitively against the
    /// handler registry.
    pub action: String,
    /// Action-specific parameters. Absent means empty.
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
    /// Optional free-form context string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Request {
    /// Build a request with no parameters.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: serde_json::Map::new(),
            context: None,
        }
    }

    /// Build a request from a JSON object literal. Non-object values are
    /// treated as empty parameters.
    pub fn with_params(action: impl Into<String>, params: Value) -> Self {
        let parameters = match params {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            action: action.into(),
            parameters,
            context: None,
        }
    }
}

/// The normalized outcome of a dispatched request.
///
/// Invariant: `success == false` implies `error` is `Some`, and
/// `success == true` implies `error` is `None`. The constructors below are
/// the only way the coordinator builds responses, so dispatch output never
/// reaches the ambiguous states the flags would otherwise allow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    /// Handler-specific payload. Shape is not otherwise constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable status text.
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A successful response with an optional payload and status text.
    pub fn ok(data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error: None,
        }
    }

    /// A failure response. The error string is the user-visible outcome.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: String::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parameters_default_to_empty() {
        let req: Request = serde_json::from_str(r#"{"action":"list_projects"}"#).unwrap();
        assert_eq!(req.action, "list_projects");
        assert!(req.parameters.is_empty());
        assert!(req.context.is_none());
    }

    #[test]
    fn request_round_trips_with_parameters() {
        let req = Request::with_params(
            "read_file",
            serde_json::json!({"path": "demo/README.md"}),
        );
        let json = serde_json::to_string(&req).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, "read_file");
        assert_eq!(
            back.parameters.get("path").and_then(Value::as_str),
            Some("demo/README.md")
        );
    }

    #[test]
    fn with_params_ignores_non_object() {
        let req = Request::with_params("chat", Value::String("not a map".into()));
        assert!(req.parameters.is_empty());
    }

    #[test]
    fn ok_response_has_no_error() {
        let resp = Response::ok(Some(serde_json::json!({"n": 1})), "done");
        assert!(resp.success);
        assert!(resp.error.is_none());
        assert_eq!(resp.message, "done");
    }

    #[test]
    fn error_response_has_no_data() {
        let resp = Response::error("boom");
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("boom"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn none_fields_are_omitted_from_wire() {
        let json = serde_json::to_string(&Response::ok(None, "")).unwrap();
        assert!(!json.contains("data"));
        assert!(!json.contains("error"));
    }
}
