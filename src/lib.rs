pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{ChatSession, Responder};

pub use cli::Commands;

pub use connector::api::{Container, ContainerConfig, ProviderKind};
pub use connector::{AnthropicResponder, CredentialSource, GeminiResponder, MockResponder, PersonaFile};

pub use domain::{
    ChatError, Exchange, PersonaConfig, ResponderError, ResponderErrorKind, SessionState,
    TranscriptOrder,
};
