//! Structured follow-up payload and the defensive filter applied to it.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Output of the structured completion.
///
/// `main_response` is part of the declared schema but always empty in this
/// usage; only `follow_up_questions` is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredOutput {
    #[serde(default)]
    pub main_response: String,
    #[serde(default)]
    pub follow_up_questions: Option<Vec<String>>,
}

impl StructuredOutput {
    /// Schema name announced to the provider.
    pub const SCHEMA_NAME: &'static str = "follow_up_suggestions";

    /// JSON Schema the provider must conform to.
    ///
    /// Strict structured-output modes require every property to be listed in
    /// `required`, so the optional list is expressed as a nullable array.
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "main_response": { "type": "string" },
                "follow_up_questions": {
                    "type": ["array", "null"],
                    "items": { "type": "string" }
                }
            },
            "required": ["main_response", "follow_up_questions"],
            "additionalProperties": false
        })
    }
}

/// Result of running [`FollowUpFilter::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredFollowUps {
    /// Questions to deliver to the client.
    pub questions: Vec<String>,
    /// Entries longer than the word heuristic. Kept, but worth a log line.
    pub overlong: Vec<String>,
    /// True if the whole list was dropped because an entry was blank.
    pub discarded: bool,
}

/// Orchestrator-side guard on model-produced follow-ups.
///
/// The prompt asks for 2-4 questions of at most seven words; the filter does
/// not enforce the word count, it only reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpFilter {
    pub max_items: usize,
    pub max_words: usize,
}

impl Default for FollowUpFilter {
    fn default() -> Self {
        Self {
            max_items: 4,
            max_words: 7,
        }
    }
}

impl FollowUpFilter {
    pub fn apply(&self, questions: Option<Vec<String>>) -> FilteredFollowUps {
        let Some(questions) = questions else {
            return FilteredFollowUps::default();
        };

        if questions.iter().any(|q| q.trim().is_empty()) {
            return FilteredFollowUps {
                discarded: true,
                ..Default::default()
            };
        }

        let questions: Vec<String> = questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .take(self.max_items)
            .collect();

        let overlong = questions
            .iter()
            .filter(|q| q.split_whitespace().count() > self.max_words)
            .cloned()
            .collect();

        FilteredFollowUps {
            questions,
            overlong,
            discarded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deserialize_absent_questions() {
        let output: StructuredOutput = serde_json::from_str(r#"{"main_response":""}"#).unwrap();
        assert_eq!(output.follow_up_questions, None);
    }

    #[test]
    fn test_deserialize_rejects_non_string_entries() {
        let result = serde_json::from_str::<StructuredOutput>(
            r#"{"main_response":"","follow_up_questions":["ok", 3]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result =
            serde_json::from_str::<StructuredOutput>(r#"{"answer":"x","follow_up_questions":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_requires_both_fields() {
        let schema = StructuredOutput::json_schema();
        assert_eq!(
            schema["required"],
            json!(["main_response", "follow_up_questions"])
        );
    }

    #[test]
    fn test_filter_none_yields_empty() {
        let filtered = FollowUpFilter::default().apply(None);
        assert!(filtered.questions.is_empty());
        assert!(!filtered.discarded);
    }

    #[test]
    fn test_filter_discards_list_with_blank_entry() {
        let filtered =
            FollowUpFilter::default().apply(Some(strings(&["What is a trait?", "   "])));
        assert!(filtered.discarded);
        assert!(filtered.questions.is_empty());
    }

    #[test]
    fn test_filter_caps_item_count() {
        let filtered =
            FollowUpFilter::default().apply(Some(strings(&["a?", "b?", "c?", "d?", "e?"])));
        assert_eq!(filtered.questions, strings(&["a?", "b?", "c?", "d?"]));
    }

    #[test]
    fn test_filter_reports_but_keeps_overlong() {
        let long = "Why does the borrow checker reject this particular program";
        let filtered = FollowUpFilter::default().apply(Some(strings(&["Short one?", long])));
        assert_eq!(filtered.questions.len(), 2);
        assert_eq!(filtered.overlong, strings(&[long]));
    }
}
