use serde::{Deserialize, Serialize};

/// Model used when the request body does not name one.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One content part of a chat message.
///
/// Clients may send parts of any type (images, tool output, ...); only text
/// parts carry meaning here. Unknown part types deserialize fine and are
/// ignored rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            part_type: "text".to_string(),
            text: Some(text.into()),
        }
    }

    /// The text payload, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        if self.part_type == "text" {
            self.text.as_deref()
        } else {
            None
        }
    }
}

/// A single chat message: a role plus an ordered sequence of content parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![ContentPart::text(text)],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Concatenated text of all text parts, non-text parts skipped.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .concat()
    }
}

/// Request body accepted by the relay's chat route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Flatten a chat history into the single prompt string sent upstream.
///
/// Messages are newline-joined in order with role information discarded.
/// The upstream generate endpoint receives an undifferentiated prompt; this
/// matches what deployed front-ends already rely on, so keep it flat rather
/// than introducing a role-tagged format.
pub fn flatten_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(ChatMessage::text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_prompt_joins_text_in_order() {
        let messages = vec![
            ChatMessage::system("You are terse."),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("bye"),
        ];
        assert_eq!(
            flatten_prompt(&messages),
            "You are terse.\nhi\nhello\nbye"
        );
    }

    #[test]
    fn flatten_prompt_discards_roles() {
        let as_user = vec![ChatMessage::user("same"), ChatMessage::user("text")];
        let mixed = vec![ChatMessage::assistant("same"), ChatMessage::system("text")];
        assert_eq!(flatten_prompt(&as_user), flatten_prompt(&mixed));
    }

    #[test]
    fn non_text_parts_are_ignored() {
        let msg = ChatMessage {
            role: Role::User,
            parts: vec![
                ContentPart::text("look at "),
                ContentPart {
                    part_type: "image".to_string(),
                    text: None,
                },
                ContentPart::text("this"),
            ],
        };
        assert_eq!(msg.text(), "look at this");
    }

    #[test]
    fn relay_request_defaults_model() {
        let req: RelayRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","parts":[{"type":"text","text":"hi"}]}]}"#,
        )
        .unwrap();
        assert_eq!(req.model, DEFAULT_MODEL);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn relay_request_accepts_explicit_model() {
        let req: RelayRequest =
            serde_json::from_str(r#"{"messages":[],"model":"mistral"}"#).unwrap();
        assert_eq!(req.model, "mistral");
    }

    #[test]
    fn unknown_part_types_deserialize() {
        let msg: ChatMessage = serde_json::from_str(
            r#"{"role":"user","parts":[{"type":"file","name":"a.txt"},{"type":"text","text":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(msg.text(), "x");
    }
}
