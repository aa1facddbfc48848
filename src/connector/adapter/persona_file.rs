use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::domain::PersonaConfig;

/// On-disk persona definition. Every key is optional; missing keys keep the
/// built-in Mumbai persona's value.
///
/// ```toml
/// name = "Pune Guide"
/// title = "Pune Local"
/// model_id = "gemini-2.0-flash"
/// description = """
/// - You are a friendly guide to Pune.
/// """
/// instructions = """
/// - Keep answers short.
/// """
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaFile {
    pub name: Option<String>,
    pub title: Option<String>,
    pub model_id: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

impl PersonaFile {
    pub fn load(path: &Path) -> Result<PersonaConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona file {}", path.display()))?;
        let file = Self::parse(&content)
            .with_context(|| format!("Failed to parse persona file {}", path.display()))?;
        debug!("Loaded persona from {}", path.display());
        Ok(file.into_persona())
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn into_persona(self) -> PersonaConfig {
        let base = PersonaConfig::mumbai_local();

        let mut persona = PersonaConfig::new(
            self.model_id.unwrap_or_else(|| base.model_id().to_string()),
            self.description.as_deref().unwrap_or(base.description()),
            self.instructions.as_deref().unwrap_or(base.instructions()),
        );
        if let Some(name) = self.name {
            persona = persona.with_name(name);
        }
        if let Some(title) = self.title {
            persona = persona.with_title(title);
        }
        persona
    }
}
