// API request/response types

use serde::Serialize;
use serde_json::Value;

/// Request field carrying the task description for analysis
pub const TASK_TEXT_FIELD: &str = "task_text";

/// Request field carrying the partial task for suggestions
pub const PARTIAL_TASK_FIELD: &str = "partial_task";

/// Error body returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Extract a required text field from a request body.
///
/// Absent, non-string and empty values all count as missing.
pub fn required_text<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}
