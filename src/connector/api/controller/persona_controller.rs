use anyhow::Result;

use crate::PersonaConfig;

use super::super::Container;

pub struct PersonaController<'a> {
    container: &'a Container,
}

impl<'a> PersonaController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn show(&self) -> Result<String> {
        Ok(self.format_persona(self.container.persona()))
    }

    fn format_persona(&self, persona: &PersonaConfig) -> String {
        format!(
            "{}\n{}\nName:     {}\nProvider: {}\nModel:    {}\n\nSystem prompt:\n{}",
            persona.title(),
            "=".repeat(persona.title().chars().count()),
            persona.name(),
            self.container.provider().as_str(),
            persona.model_id(),
            persona.system_prompt()
        )
    }
}
