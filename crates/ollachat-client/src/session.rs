use futures_util::StreamExt;

use ollachat_types::StreamEvent;

use crate::error::ClientError;
use crate::stream::{EventStream, RelayClient};
use crate::transcript::{Transcript, TurnState};

/// One client session: a transcript plus the state machine driving it.
///
/// Single-flight per transcript: a second submit while a turn is active is
/// rejected rather than queued.
pub struct ChatSession {
    client: RelayClient,
    transcript: Transcript,
    state: TurnState,
    model: String,
}

impl ChatSession {
    pub fn new(client: RelayClient, model: String) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            state: TurnState::Idle,
            model,
        }
    }

    pub fn client(&self) -> &RelayClient {
        &self.client
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }

    /// Run one full turn: validate input, append the user message, open the
    /// relay call, and stream the assistant reply into the transcript.
    ///
    /// `on_chunk` is invoked for every appended chunk so the caller can
    /// render incrementally.
    pub async fn submit(
        &mut self,
        input: &str,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<(), ClientError> {
        self.begin_turn(input)?;

        let events = match self.client.open(self.transcript.messages(), &self.model).await {
            Ok(events) => events,
            Err(e) => {
                self.fail_turn(&e);
                return Err(e);
            }
        };

        self.drive(events, on_chunk).await
    }

    /// Validate input and record the user side of the turn.
    ///
    /// The user message is appended optimistically, before the network call
    /// resolves.
    fn begin_turn(&mut self, input: &str) -> Result<(), ClientError> {
        if self.state.is_active() {
            return Err(ClientError::TurnInFlight);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        self.transcript.push_user(text);
        self.state = TurnState::AwaitingFirstByte;
        Ok(())
    }

    /// Consume a decoded event stream into the assistant placeholder.
    ///
    /// A stream that ends without the terminal sentinel counts as a broken
    /// connection.
    async fn drive(
        &mut self,
        mut events: EventStream,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<(), ClientError> {
        self.transcript.begin_assistant();

        while let Some(event) = events.next().await {
            match event {
                Ok(StreamEvent::Text { content }) => {
                    self.state = TurnState::Streaming;
                    self.transcript.append_to_assistant(&content);
                    on_chunk(&content);
                }
                Ok(StreamEvent::Done) => {
                    self.state = TurnState::Complete;
                    return Ok(());
                }
                Err(e) => {
                    self.fail_turn(&e);
                    return Err(e);
                }
            }
        }

        let e = ClientError::Transport("stream ended before [DONE]".to_string());
        self.fail_turn(&e);
        Err(e)
    }

    /// Surface a transport failure as a visible system message. No retry.
    fn fail_turn(&mut self, error: &ClientError) {
        self.transcript.push_system(&format!("Error: {}", error));
        self.state = TurnState::Errored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use ollachat_types::Role;

    fn session() -> ChatSession {
        ChatSession::new(RelayClient::new("http://localhost:3000"), "llama3.2".to_string())
    }

    fn events(items: Vec<Result<StreamEvent, ClientError>>) -> EventStream {
        stream::iter(items).boxed()
    }

    fn text(content: &str) -> Result<StreamEvent, ClientError> {
        Ok(StreamEvent::Text {
            content: content.to_string(),
        })
    }

    #[tokio::test]
    async fn chunks_reassemble_into_one_assistant_message() {
        let mut session = session();
        session.begin_turn("hi").unwrap();

        let mut seen = String::new();
        session
            .drive(
                events(vec![text("a"), text("b"), text("c"), Ok(StreamEvent::Done)]),
                &mut |chunk| seen.push_str(chunk),
            )
            .await
            .unwrap();

        assert_eq!(seen, "abc");
        assert_eq!(session.state(), TurnState::Complete);

        // Exactly one assistant message, never three.
        let assistants: Vec<_> = session
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .collect();
        assert_eq!(assistants.len(), 1);
        assert_eq!(assistants[0].text(), "abc");
    }

    #[tokio::test]
    async fn empty_input_creates_no_user_message() {
        let mut session = session();
        assert_eq!(session.begin_turn(""), Err(ClientError::EmptyInput));
        assert_eq!(session.begin_turn("   \t\n"), Err(ClientError::EmptyInput));
        assert!(session.transcript().is_empty());
        assert_eq!(session.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn second_submit_is_rejected_while_in_flight() {
        let mut session = session();
        session.begin_turn("first").unwrap();
        assert!(session.state().is_active());
        assert_eq!(session.begin_turn("second"), Err(ClientError::TurnInFlight));
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn turn_completes_back_to_submittable_state() {
        let mut session = session();
        session.begin_turn("one").unwrap();
        session
            .drive(events(vec![text("x"), Ok(StreamEvent::Done)]), &mut |_| {})
            .await
            .unwrap();

        // A new turn is allowed after completion.
        assert!(session.begin_turn("two").is_ok());
    }

    #[tokio::test]
    async fn transport_failure_becomes_a_system_message() {
        let mut session = session();
        session.begin_turn("hi").unwrap();

        let result = session
            .drive(
                events(vec![
                    text("partial"),
                    Err(ClientError::Transport("connection reset".to_string())),
                ]),
                &mut |_| {},
            )
            .await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        assert_eq!(session.state(), TurnState::Errored);

        let last = session.transcript().messages().last().unwrap();
        assert_eq!(last.role, Role::System);
        assert!(last.text().contains("connection reset"));

        // Partial content stays; nothing is truncated.
        let assistant = &session.transcript().messages()[1];
        assert_eq!(assistant.text(), "partial");
    }

    #[tokio::test]
    async fn stream_ending_without_sentinel_is_transport_loss() {
        let mut session = session();
        session.begin_turn("hi").unwrap();

        let result = session.drive(events(vec![text("a")]), &mut |_| {}).await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        assert_eq!(session.state(), TurnState::Errored);
    }

    #[tokio::test]
    async fn whitespace_is_trimmed_from_accepted_input() {
        let mut session = session();
        session.begin_turn("  hello  ").unwrap();
        assert_eq!(
            session.transcript().messages()[0].text(),
            "hello".to_string()
        );
    }
}
