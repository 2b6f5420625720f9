//! System instructions for the two model calls

use crate::schema::{format_instructions, SUGGESTION_LIST, TASK_ANALYSIS};

/// Analysis runs with no sampling randomness
pub const ANALYSIS_TEMPERATURE: f32 = 0.0;

/// System instruction for task analysis; `today` is `YYYY-MM-DD`
pub fn analysis_instruction(today: &str) -> String {
    format!(
        "You are a professional task analysis engine. The current date is {today}. \
         Your sole purpose is to return ONLY a valid JSON object. \
         Strictly format any date found as YYYY-MM-DD. \n{}",
        format_instructions(&TASK_ANALYSIS)
    )
}

/// System instruction for completion suggestions
pub fn suggestion_instruction() -> String {
    format!(
        "You are a helpful AI completer. \
         Generate 5 unique suggestions to complete the user's partial text. \
         The response format must be:\n{}",
        format_instructions(&SUGGESTION_LIST)
    )
}
