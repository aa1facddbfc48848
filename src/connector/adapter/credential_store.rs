use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Environment flag that switches credential lookup to the hosted secrets file.
pub const HOSTED_MODE_VAR: &str = "MUMBAI_LOCAL_HOSTED";
pub const DEFAULT_SECRETS_FILE: &str = ".secrets/secrets.toml";

/// Where the model-provider API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Hosted deployments: a TOML secrets file with top-level string keys.
    SecretsFile(PathBuf),
    /// Local runs: a `.env` file (an explicit path, or the nearest `.env`
    /// found by walking up from the working dir) is loaded into the process
    /// environment, then the variable is read. Variables already set win.
    EnvFile(Option<PathBuf>),
}

impl CredentialSource {
    pub fn select(hosted: bool, secrets_file: Option<PathBuf>, env_file: Option<PathBuf>) -> Self {
        if hosted {
            Self::SecretsFile(secrets_file.unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE)))
        } else {
            Self::EnvFile(env_file)
        }
    }

    /// True when `MUMBAI_LOCAL_HOSTED` is set to a non-empty value.
    pub fn hosted_from_env() -> bool {
        std::env::var(HOSTED_MODE_VAR)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::SecretsFile(path) => format!("secrets file {}", path.display()),
            Self::EnvFile(Some(path)) => format!("environment / {}", path.display()),
            Self::EnvFile(None) => "environment / .env".to_string(),
        }
    }

    /// Look up `name`. `Ok(None)` means no credential is configured, which is
    /// not an error here: the responder reports it as `Unauthenticated` on use.
    pub fn api_key(&self, name: &str) -> Result<Option<String>> {
        let value = match self {
            Self::SecretsFile(path) => read_secrets_file(path, name)?,
            Self::EnvFile(path) => {
                load_env_file(path.as_deref())?;
                non_empty(std::env::var(name).ok())
            }
        };

        if value.is_none() {
            warn!("No {} found in {}", name, self.describe());
        }
        Ok(value)
    }
}

fn read_secrets_file(path: &Path, name: &str) -> Result<Option<String>> {
    if !path.exists() {
        warn!("Secrets file {} does not exist", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse secrets file {}", path.display()))?;

    debug!("Loaded secrets file {}", path.display());
    Ok(non_empty(
        table.get(name).and_then(|v| v.as_str()).map(String::from),
    ))
}

/// Load `.env` entries into the process environment without overriding
/// existing variables, so settings such as base URLs reach the responders too.
fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            dotenvy::from_path(p)
                .with_context(|| format!("Failed to load env file {}", p.display()))?;
            debug!("Loaded env file {}", p.display());
        }
        None => match dotenvy::dotenv() {
            Ok(p) => debug!("Loaded env file {}", p.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(e).context("Failed to load .env file"),
        },
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
