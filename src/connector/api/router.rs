use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, PersonaController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    persona_controller: PersonaController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            persona_controller: PersonaController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { question } => self.ask_controller.ask(question.join(" ")).await,
            Commands::Persona => self.persona_controller.show().await,
            Commands::Chat => unreachable!("Chat command is handled separately in main"),
            Commands::Serve { .. } => unreachable!("Serve command is handled separately in main"),
        }
    }
}
