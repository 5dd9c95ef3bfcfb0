//! Response returned to a scheduled invocation

use serde::Serialize;

const OK_BODY: &str = r#"{"statusMessage": "OK"}"#;

/// Fixed success response of an invocation, in the API gateway proxy shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub is_base64_encoded: bool,
    pub status_code: u16,
    pub headers: serde_json::Map<String, serde_json::Value>,
    pub multi_value_headers: serde_json::Map<String, serde_json::Value>,
    pub body: String,
}

impl InvocationResponse {
    pub fn ok() -> Self {
        Self {
            is_base64_encoded: false,
            status_code: 200,
            headers: serde_json::Map::new(),
            multi_value_headers: serde_json::Map::new(),
            body: OK_BODY.to_string(),
        }
    }
}
