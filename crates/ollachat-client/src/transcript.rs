use ollachat_types::{ChatMessage, Role};

/// Per-turn state machine.
///
/// `Idle` is both initial and terminal between turns; `Complete` and
/// `Errored` record how the previous turn ended and allow a new submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingFirstByte,
    Streaming,
    Complete,
    Errored,
}

impl TurnState {
    /// Whether a turn is currently in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, TurnState::AwaitingFirstByte | TurnState::Streaming)
    }
}

/// The ordered, append-only record of a conversation.
///
/// Owned exclusively by the client session; the relay never sees it twice.
/// The only in-place mutation allowed is growing the most recent assistant
/// message while a turn is streaming.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_system(&mut self, text: &str) {
        self.messages.push(ChatMessage::system(text));
    }

    /// Append the empty assistant placeholder for an incoming stream.
    pub fn begin_assistant(&mut self) {
        self.messages.push(ChatMessage::assistant(""));
    }

    /// Grow the most recent assistant message in place.
    ///
    /// Continuations never insert a new message; content only ever grows
    /// until the turn finishes.
    pub fn append_to_assistant(&mut self, chunk: &str) {
        // No placeholder yet: start one so the chunk is not lost.
        let needs_placeholder = !matches!(
            self.messages.last(),
            Some(m) if m.role == Role::Assistant
        );
        if needs_placeholder {
            self.begin_assistant();
        }

        if let Some(message) = self.messages.last_mut() {
            if let Some(part) = message.parts.iter_mut().find(|p| p.part_type == "text") {
                part.text.get_or_insert_with(String::new).push_str(chunk);
            } else {
                message.parts.push(ollachat_types::ContentPart::text(chunk));
            }
        }
    }

    /// Text of the most recent message, if any.
    pub fn last_text(&self) -> Option<String> {
        self.messages.last().map(ChatMessage::text)
    }

    /// Drop everything except system messages, mirroring a `/clear`.
    pub fn clear(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_grow_a_single_assistant_message() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.begin_assistant();
        transcript.append_to_assistant("a");
        transcript.append_to_assistant("b");
        transcript.append_to_assistant("c");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last_text(), Some("abc".to_string()));
    }

    #[test]
    fn append_without_placeholder_starts_one() {
        let mut transcript = Transcript::new();
        transcript.append_to_assistant("orphan");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, Role::Assistant);
        assert_eq!(transcript.last_text(), Some("orphan".to_string()));
    }

    #[test]
    fn clear_keeps_system_messages() {
        let mut transcript = Transcript::new();
        transcript.push_system("banner");
        transcript.push_user("hi");
        transcript.begin_assistant();
        transcript.clear();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, Role::System);
    }

    #[test]
    fn turn_state_activity() {
        assert!(!TurnState::Idle.is_active());
        assert!(TurnState::AwaitingFirstByte.is_active());
        assert!(TurnState::Streaming.is_active());
        assert!(!TurnState::Complete.is_active());
        assert!(!TurnState::Errored.is_active());
    }
}
