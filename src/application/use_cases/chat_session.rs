use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::Responder;
use crate::domain::{ChatError, Exchange, PersonaConfig, SessionState, TranscriptOrder};

/// Ordered transcript of question/answer exchanges for one interactive session.
///
/// Each [`submit`](Self::submit) is an independent call to the [`Responder`]:
/// earlier exchanges are only kept for display and are never sent back to the
/// model. `submit` takes `&mut self`, so one session has at most one submission
/// in flight.
pub struct ChatSession {
    persona: Arc<PersonaConfig>,
    responder: Arc<dyn Responder>,
    exchanges: Vec<Exchange>,
    state: SessionState,
}

impl ChatSession {
    pub fn new(persona: Arc<PersonaConfig>, responder: Arc<dyn Responder>) -> Self {
        Self {
            persona,
            responder,
            exchanges: Vec::new(),
            state: SessionState::Idle,
        }
    }

    /// Ask `question` and record the answer.
    ///
    /// The question is trimmed first; a blank question yields
    /// [`ChatError::EmptyInput`] and leaves the session untouched. A responder
    /// failure is returned unchanged as [`ChatError::Responder`] and nothing
    /// is appended. Returns the newly recorded exchange on success.
    pub async fn submit(&mut self, question: &str) -> Result<Exchange, ChatError> {
        if self.state != SessionState::Idle {
            return Err(ChatError::Busy);
        }

        let question = question.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return Err(ChatError::EmptyInput);
        }

        let sequence = self.next_sequence();
        let guard = SubmittingGuard::enter(&mut self.state);

        info!(
            "Submitting question #{} to {} ({})",
            sequence,
            self.responder.provider_name(),
            self.persona.model_id()
        );
        let start_time = Instant::now();

        let result = self.responder.generate(&self.persona, question).await;
        drop(guard);

        match result {
            Ok(answer) => {
                let exchange = Exchange::new(question, answer, sequence);
                info!(
                    "Answer #{} received in {:.2}s ({} chars)",
                    exchange.sequence(),
                    start_time.elapsed().as_secs_f64(),
                    exchange.answer().len()
                );
                self.exchanges.push(exchange.clone());
                Ok(exchange)
            }
            Err(e) => {
                warn!("Responder failed ({}): {}", e.kind(), e.message());
                Err(e.into())
            }
        }
    }

    /// Read the transcript without modifying it.
    pub fn transcript(&self, order: TranscriptOrder) -> Vec<Exchange> {
        match order {
            TranscriptOrder::Chronological => self.exchanges.clone(),
            TranscriptOrder::Reverse => self.exchanges.iter().rev().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    fn next_sequence(&self) -> u64 {
        self.exchanges.last().map_or(1, |e| e.sequence() + 1)
    }
}

/// Holds the session in `Submitting` and restores `Idle` when dropped, including
/// when the submitting future is cancelled mid-call.
struct SubmittingGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        *state = SessionState::Submitting;
        Self { state }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.state = SessionState::Idle;
    }
}
