pub mod ask_controller;
pub mod chat_controller;
pub mod persona_controller;

pub use ask_controller::AskController;
pub use chat_controller::{format_transcript, ChatController};
pub use persona_controller::PersonaController;
