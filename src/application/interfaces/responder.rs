use async_trait::async_trait;

use crate::domain::{PersonaConfig, ResponderError};

/// Turns a question into a complete natural-language answer, speaking as the
/// given persona.
///
/// Implementors encapsulate transport, credentials and vendor-specific API
/// details. Every call is independent: no conversation history is passed to
/// the model. Calls may incur provider cost and need not be deterministic.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generate one full answer for `question`.
    ///
    /// Returns a single complete answer on success; never a partial result.
    async fn generate(&self, persona: &PersonaConfig, question: &str)
        -> Result<String, ResponderError>;

    /// Short identifier for logging (e.g. `"gemini"`).
    fn provider_name(&self) -> &str;
}
