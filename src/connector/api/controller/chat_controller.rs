use crate::application::ChatSession;
use crate::domain::{ChatError, Exchange, TranscriptOrder};

use super::super::Container;

const DIVIDER: &str = "---";

/// Terminal chat: owns one session for the lifetime of the REPL and renders
/// its transcript newest first after every answer.
pub struct ChatController {
    session: ChatSession,
}

impl ChatController {
    pub fn new(container: &Container) -> Self {
        Self {
            session: container.chat_session(),
        }
    }

    pub fn greeting(&self) -> String {
        format!(
            "{}\nAsk anything about Mumbai or any other topic. /quit to leave.\n",
            self.session.persona().title()
        )
    }

    /// Submit one line of input and return what should be printed.
    pub async fn handle_line(&mut self, line: &str) -> String {
        match self.session.submit(line).await {
            Ok(_) => format_transcript(&self.session.transcript(TranscriptOrder::Reverse)),
            Err(ChatError::EmptyInput) => "(type a question first)".to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}

/// Alternating "You:" / answer blocks separated by a divider, in the order given.
pub fn format_transcript(exchanges: &[Exchange]) -> String {
    if exchanges.is_empty() {
        return "No conversation yet.".to_string();
    }

    let mut output = String::from("Conversation\n\n");
    for exchange in exchanges {
        output.push_str(&format!("You: {}\n\n", exchange.question()));
        output.push_str(exchange.answer());
        output.push_str(&format!("\n\n{DIVIDER}\n\n"));
    }
    output
}
