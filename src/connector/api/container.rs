use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use tracing::{debug, info};

use crate::application::{ChatSession, Responder};
use crate::connector::adapter::{
    anthropic_responder, gemini_responder, AnthropicResponder, CredentialSource,
    GeminiResponder, MockResponder, PersonaFile,
};
use crate::domain::PersonaConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which model provider answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Anthropic,
    /// Offline canned answers, no credential needed.
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mock => "mock",
        }
    }

    /// Name of the credential this provider needs, if any.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some(gemini_responder::API_KEY_VAR),
            ProviderKind::Anthropic => Some(anthropic_responder::API_KEY_VAR),
            ProviderKind::Mock => None,
        }
    }
}

pub struct ContainerConfig {
    pub provider: ProviderKind,
    /// Persona TOML file; the built-in Mumbai persona when absent.
    pub persona_file: Option<PathBuf>,
    /// Overrides the persona's `model_id`.
    pub model: Option<String>,
    /// Read the credential from the secrets file instead of the environment.
    pub hosted: bool,
    pub secrets_file: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            persona_file: None,
            model: None,
            hosted: false,
            secrets_file: None,
            env_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Wires the persona and the responder once at start-up and hands out fresh
/// chat sessions that share them.
pub struct Container {
    persona: Arc<PersonaConfig>,
    responder: Arc<dyn Responder>,
    provider: ProviderKind,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let mut persona = match config.persona_file.as_deref() {
            Some(path) => PersonaFile::load(path)?,
            None => PersonaConfig::mumbai_local(),
        };
        if let Some(model) = config.model.as_deref() {
            persona = persona.with_model_id(model);
        }

        let credentials =
            CredentialSource::select(config.hosted, config.secrets_file, config.env_file);
        let timeout = Duration::from_secs(config.timeout_secs.max(1));

        let responder: Arc<dyn Responder> = match config.provider {
            ProviderKind::Gemini => {
                debug!("Reading Gemini credential from {}", credentials.describe());
                let key = credentials.api_key(gemini_responder::API_KEY_VAR)?;
                Arc::new(GeminiResponder::with_key(key, timeout))
            }
            ProviderKind::Anthropic => {
                debug!("Reading Anthropic credential from {}", credentials.describe());
                let key = credentials.api_key(anthropic_responder::API_KEY_VAR)?;
                Arc::new(AnthropicResponder::with_key(key, timeout))
            }
            ProviderKind::Mock => {
                debug!("Using mock responder");
                Arc::new(MockResponder::new())
            }
        };

        info!(
            "Persona '{}' on {} model {}",
            persona.name(),
            config.provider.as_str(),
            persona.model_id()
        );

        Ok(Self {
            persona: Arc::new(persona),
            responder,
            provider: config.provider,
        })
    }

    /// Assemble from ready-made parts, bypassing configuration.
    pub fn with_responder(persona: PersonaConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            persona: Arc::new(persona),
            responder,
            provider: ProviderKind::Mock,
        }
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.persona.clone(), self.responder.clone())
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn responder(&self) -> Arc<dyn Responder> {
        self.responder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mock_container_uses_builtin_persona() {
        let container = Container::new(ContainerConfig {
            provider: ProviderKind::Mock,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(container.persona(), &PersonaConfig::mumbai_local());
        assert_eq!(container.responder().provider_name(), "mock");
    }

    #[test]
    fn model_flag_overrides_persona_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model_id = \"gemini-1.5-flash\"\nname = \"Tester\"").unwrap();

        let container = Container::new(ContainerConfig {
            provider: ProviderKind::Mock,
            persona_file: Some(file.path().to_path_buf()),
            model: Some("gemini-2.5-flash".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(container.persona().name(), "Tester");
        assert_eq!(container.persona().model_id(), "gemini-2.5-flash");
    }

    #[test]
    fn hosted_gemini_without_secrets_still_builds() {
        let dir = tempfile::TempDir::new().unwrap();
        let container = Container::new(ContainerConfig {
            provider: ProviderKind::Gemini,
            hosted: true,
            secrets_file: Some(dir.path().join("secrets.toml")),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(container.provider(), ProviderKind::Gemini);
        assert_eq!(container.responder().provider_name(), "gemini");
    }

    #[tokio::test]
    async fn sessions_from_one_container_are_independent() {
        let container = Container::with_responder(
            PersonaConfig::mumbai_local(),
            Arc::new(MockResponder::new()),
        );
        let mut first = container.chat_session();
        let second = container.chat_session();

        first.submit("hello").await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
