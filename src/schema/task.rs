// Task output schemas
// The two shapes the model is asked to produce, as schema data and as typed values

use serde::{Deserialize, Serialize};

use super::{Field, FieldType, Schema};

/// Closed set of effort scores, in increasing order
pub const EFFORT_SCORES: &[&str] = &["Low", "Medium", "High", "Critical"];

/// Number of completions requested per suggestion call
pub const SUGGESTION_COUNT: usize = 5;

pub static TASK_ANALYSIS: Schema = Schema {
    title: "TaskAnalysis",
    description: "Structured details extracted from a single to-do item.",
    fields: &[
        Field::new(
            "text",
            FieldType::String,
            "The cleaned-up final task text.",
        )
        .non_empty(),
        Field::new(
            "time",
            FieldType::String,
            "Extracted deadline or date. Must be YYYY-MM-DD or a time of day/unspecified.",
        ),
        Field::new(
            "category",
            FieldType::String,
            "A category label (e.g., Work, Study, Health).",
        ),
        Field::new(
            "urgent",
            FieldType::Boolean,
            "True if the task is marked urgent or uses words like ASAP.",
        ),
        Field::new(
            "note",
            FieldType::String,
            "A helpful, concise note or warning for the user.",
        ),
        Field::new(
            "effort_score",
            FieldType::String,
            "Assigned score: Low, Medium, High, or Critical.",
        )
        .one_of(EFFORT_SCORES),
    ],
};

pub static SUGGESTION_LIST: Schema = Schema {
    title: "SuggestionList",
    description: "Completions for a partially typed to-do item.",
    fields: &[Field::new(
        "suggestions",
        FieldType::StringList {
            len: SUGGESTION_COUNT,
        },
        "A list of 5 complete task suggestions.",
    )
    .non_empty()],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortScore {
    Low,
    Medium,
    High,
    Critical,
}

/// Analysis of one task description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskAnalysis {
    pub text: String,
    pub time: String,
    pub category: String,
    pub urgent: bool,
    pub note: String,
    pub effort_score: EffortScore,
}

/// Suggested completions, in model order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionList {
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{format_instructions, parse, SchemaViolation};

    const MILK: &str = r#"{"text":"Buy milk","time":"2024-01-01","category":"Home","urgent":false,"note":"","effort_score":"Low"}"#;

    #[test]
    fn test_effort_scores_match_enum() {
        for score in EFFORT_SCORES {
            let parsed: EffortScore = serde_json::from_value(serde_json::json!(score)).unwrap();
            assert_eq!(serde_json::to_value(parsed).unwrap(), *score);
        }
    }

    #[test]
    fn test_parse_task_analysis() {
        let analysis: TaskAnalysis = parse(&TASK_ANALYSIS, MILK).unwrap();
        assert_eq!(analysis.text, "Buy milk");
        assert_eq!(analysis.effort_score, EffortScore::Low);
        assert!(!analysis.urgent);
        assert!(analysis.note.is_empty());
    }

    #[test]
    fn test_reserialized_analysis_is_unchanged() {
        let analysis: TaskAnalysis = parse(&TASK_ANALYSIS, MILK).unwrap();
        let expected: serde_json::Value = serde_json::from_str(MILK).unwrap();
        assert_eq!(serde_json::to_value(&analysis).unwrap(), expected);
    }

    #[test]
    fn test_unknown_effort_score_rejected() {
        let raw = MILK.replace("\"Low\"", "\"Trivial\"");
        let result: Result<TaskAnalysis, _> = parse(&TASK_ANALYSIS, &raw);
        assert!(matches!(
            result,
            Err(SchemaViolation::NotAllowed {
                field: "effort_score",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_task_text_rejected() {
        let raw = MILK.replace("\"Buy milk\"", "\"\"");
        let result: Result<TaskAnalysis, _> = parse(&TASK_ANALYSIS, &raw);
        assert_eq!(result, Err(SchemaViolation::Empty("text")));
    }

    #[test]
    fn test_fenced_analysis_accepted() {
        let raw = format!("```json\n{MILK}\n```");
        let analysis: TaskAnalysis = parse(&TASK_ANALYSIS, &raw).unwrap();
        assert_eq!(analysis.category, "Home");
    }

    #[test]
    fn test_same_line_fence_accepted() {
        let raw = r#"```json {"suggestions":["a","b","c","d","e"]} ```"#;
        let list: SuggestionList = parse(&SUGGESTION_LIST, raw).unwrap();
        assert_eq!(list.suggestions, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_parse_suggestions_preserves_order() {
        let list: SuggestionList =
            parse(&SUGGESTION_LIST, r#"{"suggestions":["a","b","c","d","e"]}"#).unwrap();
        assert_eq!(list.suggestions, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_short_suggestion_list_rejected() {
        let result: Result<SuggestionList, _> =
            parse(&SUGGESTION_LIST, r#"{"suggestions":["a","b"]}"#);
        assert_eq!(
            result,
            Err(SchemaViolation::WrongLength {
                field: "suggestions",
                expected: SUGGESTION_COUNT,
                actual: 2
            })
        );
    }

    #[test]
    fn test_analysis_instructions_list_effort_scores() {
        let text = format_instructions(&TASK_ANALYSIS);
        assert!(text.contains(r#""enum":["Low","Medium","High","Critical"]"#));
        assert!(text.contains("YYYY-MM-DD"));
    }
}
