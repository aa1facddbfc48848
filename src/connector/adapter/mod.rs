pub mod anthropic_responder;
mod credential_store;
pub mod gemini_responder;
mod mock_responder;
mod persona_file;
mod provider_error;

pub use anthropic_responder::AnthropicResponder;
pub use credential_store::*;
pub use gemini_responder::GeminiResponder;
pub use mock_responder::*;
pub use persona_file::*;
