use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::Responder;
use crate::domain::{PersonaConfig, ResponderError};

/// Offline responder with deterministic answers.
///
/// Known questions get their canned answer; anything else gets a short
/// echo-style reply. Can be scripted to fail, either on every call or on the
/// next call only.
pub struct MockResponder {
    answers: HashMap<String, String>,
    failure: Option<ResponderError>,
    fail_once: Mutex<Option<ResponderError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockResponder {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            failure: None,
            fail_once: Mutex::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(question.into(), answer.into());
        self
    }

    /// Fail every call with `error`.
    pub fn failing_with(mut self, error: ResponderError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Fail the next call with `error`, then answer normally.
    pub fn failing_once_with(mut self, error: ResponderError) -> Self {
        if let Ok(slot) = self.fail_once.get_mut() {
            *slot = Some(error);
        }
        self
    }

    pub fn with_delay_ms(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        question: &str,
    ) -> Result<String, ResponderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if question.trim().is_empty() {
            return Err(ResponderError::invalid_request("question is empty"));
        }

        if let Some(error) = self.fail_once.lock().ok().and_then(|mut slot| slot.take()) {
            return Err(error);
        }

        if let Some(ref error) = self.failure {
            return Err(error.clone());
        }

        Ok(self
            .answers
            .get(question)
            .cloned()
            .unwrap_or_else(|| format!("[{}] You asked: {}", persona.name(), question)))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
