//! Contextual augmentation of the human message.

const IDENTITY_PHRASES: [&str; 3] = ["my email", "what's my email", "my user id"];

/// Append the registered user id to `message` when the user asks for it.
///
/// Triggers only when `user_id` looks like an email address and the message
/// mentions one of a fixed set of phrases (case-insensitive). Returns the
/// message unchanged otherwise.
pub fn augment_message(message: &str, user_id: &str) -> String {
    if !user_id.contains('@') {
        return message.to_string();
    }

    let lowered = message.to_lowercase();
    if IDENTITY_PHRASES.iter().any(|p| lowered.contains(p)) {
        format!(
            "{} (Note: the user's registered id is {}.)",
            message, user_id
        )
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_id_for_email_question() {
        let out = augment_message("Hey, what's my email?", "a@b.com");
        assert!(out.starts_with("Hey, what's my email?"));
        assert!(out.contains("a@b.com"));
    }

    #[test]
    fn test_case_insensitive_phrase_match() {
        assert!(augment_message("Tell me MY USER ID", "a@b.com").contains("a@b.com"));
    }

    #[test]
    fn test_unrelated_message_unchanged() {
        assert_eq!(augment_message("Explain loops", "a@b.com"), "Explain loops");
    }

    #[test]
    fn test_non_email_user_id_never_exposed() {
        assert_eq!(
            augment_message("what's my email", "user-42"),
            "what's my email"
        );
    }
}
