//! Prompt templates for a tutoring turn
//!
//! Templates use `{name}` placeholders. `{{` and `}}` produce literal braces.
//! Rendering is a single pass, so substituted values are never re-expanded.

use crate::core::error::DomainError;

/// Variable holding the tutor persona name.
pub const VAR_TUTOR_NAME: &str = "tutor_name";
/// Variable holding the user's original (unaugmented) message.
pub const VAR_QUERY: &str = "query";
/// Variable holding the accumulated main answer.
pub const VAR_RESPONSE: &str = "response";

const DEFAULT_SYSTEM: &str = r#"You are a helpful and engaging mentor named {tutor_name} who helps students learn.
Remember to:
1. Suggest improvements
2. Be encouraging and supportive
3. Focus on teaching and understanding

IMPORTANT:
- If the question is not related to the learning domain, politely decline in a humorous tone.
- Always refer to yourself as {tutor_name} and NOT as an AI assistant."#;

const DEFAULT_FOLLOW_UP: &str = r#"You are {tutor_name}, a tutor deciding whether a student would benefit from follow-up questions.

Student's question:
{query}

Your answer:
{response}

Rules:
- If the exchange is a greeting, an acknowledgement, small talk or a short factual lookup, return no follow-up questions (null).
- Only when the answer carried substantive explanatory content, return 2 to 4 follow-up questions the student could ask next.
- Each question must be concise: at most 7 words.
- Leave "main_response" as an empty string.

Reply with a JSON object of the form {{"main_response": "", "follow_up_questions": [...] or null}}."#;

/// A named template with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Variable(&'a str),
}

impl PromptTemplate {
    /// Create a template, checking that every `required` variable occurs and
    /// that no placeholder falls outside `allowed`.
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        required: &[&str],
        allowed: &[&str],
    ) -> Result<Self, DomainError> {
        let template = Self {
            name: name.into(),
            text: text.into(),
        };

        let placeholders = template.placeholders();
        if let Some(unknown) = placeholders.iter().find(|p| !allowed.contains(p)) {
            return Err(DomainError::UnknownTemplateVariable {
                template: template.name.clone(),
                variable: unknown.to_string(),
            });
        }
        if let Some(missing) = required.iter().find(|r| !placeholders.contains(r)) {
            return Err(DomainError::MissingTemplateVariable {
                template: template.name.clone(),
                variable: missing.to_string(),
            });
        }

        Ok(template)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for segment in segments(&self.text) {
            if let Segment::Variable(name) = segment
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }

    /// Substitute `vars` into the template.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, DomainError> {
        let mut out = String::with_capacity(self.text.len());
        for segment in segments(&self.text) {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Brace(c) => out.push(c),
                Segment::Variable(name) => {
                    let value = vars
                        .iter()
                        .find(|(k, _)| *k == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| DomainError::MissingTemplateVariable {
                            template: self.name.clone(),
                            variable: name.to_string(),
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split template text into literal runs, escaped braces and placeholders.
///
/// A `{` that does not start a well-formed `{ident}` is kept literally.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push(Segment::Brace('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Brace('}'));
            rest = &tail[2..];
        } else if tail.starts_with('{')
            && let Some(end) = tail.find('}')
            && is_ident(&tail[1..end])
        {
            out.push(Segment::Variable(&tail[1..end]));
            rest = &tail[end + 1..];
        } else {
            out.push(Segment::Literal(&tail[..1]));
            rest = &tail[1..];
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    out
}

/// The two templates used by a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    system: PromptTemplate,
    follow_up: PromptTemplate,
}

impl PromptTemplates {
    /// Build from raw template texts, validating their placeholders.
    pub fn from_texts(system: &str, follow_up: &str) -> Result<Self, DomainError> {
        let system = PromptTemplate::new("system", system, &[VAR_TUTOR_NAME], &[VAR_TUTOR_NAME])?;
        let follow_up = PromptTemplate::new(
            "follow_up",
            follow_up,
            &[VAR_QUERY, VAR_RESPONSE],
            &[VAR_TUTOR_NAME, VAR_QUERY, VAR_RESPONSE],
        )?;
        Ok(Self { system, follow_up })
    }

    /// Built-in templates.
    pub fn builtin() -> Self {
        Self {
            system: PromptTemplate {
                name: "system".to_string(),
                text: DEFAULT_SYSTEM.to_string(),
            },
            follow_up: PromptTemplate {
                name: "follow_up".to_string(),
                text: DEFAULT_FOLLOW_UP.to_string(),
            },
        }
    }

    pub fn default_system_text() -> &'static str {
        DEFAULT_SYSTEM
    }

    pub fn default_follow_up_text() -> &'static str {
        DEFAULT_FOLLOW_UP
    }

    pub fn system_prompt(&self, tutor_name: &str) -> Result<String, DomainError> {
        self.system.render(&[(VAR_TUTOR_NAME, tutor_name)])
    }

    pub fn follow_up_prompt(
        &self,
        tutor_name: &str,
        query: &str,
        response: &str,
    ) -> Result<String, DomainError> {
        self.follow_up.render(&[
            (VAR_TUTOR_NAME, tutor_name),
            (VAR_QUERY, query),
            (VAR_RESPONSE, response),
        ])
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}
