//! Chat turn request value objects.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Per-turn context identifying the user and the tutor persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationContext {
    pub user_id: String,
    pub tutor_name: String,
}

impl ConversationContext {
    pub fn new(user_id: impl Into<String>, tutor_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tutor_name: tutor_name.into(),
        }
    }
}

/// A single chat turn as submitted by the client.
///
/// Missing string fields deserialize as empty so that [`validate`](Self::validate)
/// can report them as client errors instead of failing at the JSON layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatTurnRequest {
    pub conversation_id: String,
    pub message: String,
    pub context: ConversationContext,
}

impl ChatTurnRequest {
    pub fn new(
        conversation_id: impl Into<String>,
        message: impl Into<String>,
        context: ConversationContext,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message: message.into(),
            context,
        }
    }

    /// Check the preconditions of a turn.
    ///
    /// Order matters: the first missing field is the one reported.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.conversation_id.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "conversationId required".to_string(),
            ));
        }
        if self.context.user_id.trim().is_empty() {
            return Err(DomainError::InvalidRequest("userId required".to_string()));
        }
        if self.context.tutor_name.trim().is_empty() {
            return Err(DomainError::InvalidRequest("tutorName required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ChatTurnRequest {
        ChatTurnRequest::new("c1", "hi", ConversationContext::new("u1", "Ada"))
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_conversation_id_reported_first() {
        let request = ChatTurnRequest::new("", "hi", ConversationContext::default());
        assert_eq!(
            request.validate().unwrap_err(),
            DomainError::InvalidRequest("conversationId required".to_string())
        );
    }

    #[test]
    fn test_missing_user_id() {
        let mut request = valid();
        request.context.user_id = "  ".to_string();
        assert_eq!(request.validate().unwrap_err().to_string(), "userId required");
    }

    #[test]
    fn test_missing_tutor_name() {
        let mut request = valid();
        request.context.tutor_name.clear();
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "tutorName required"
        );
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{
            "conversationId": "c1",
            "message": "What is recursion?",
            "context": { "userId": "a@b.com", "tutorName": "Ada" }
        }"#;
        let request: ChatTurnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.conversation_id, "c1");
        assert_eq!(request.context.user_id, "a@b.com");
        assert_eq!(request.context.tutor_name, "Ada");
    }

    #[test]
    fn test_deserialize_missing_context_defaults_to_empty() {
        let request: ChatTurnRequest =
            serde_json::from_str(r#"{"conversationId":"c1","message":"hi"}"#).unwrap();
        assert!(request.context.user_id.is_empty());
        assert!(request.validate().is_err());
    }
}
