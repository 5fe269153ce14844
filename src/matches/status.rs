use serde_json::{json, Value};

/// Valid JSON of any shape is returned as-is. Anything else becomes
/// `{"error": <raw>}`.
pub fn decode_status(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(status) => status,
        Err(_) => json!({ "error": raw }),
    }
}
