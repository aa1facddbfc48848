use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mumbai_local::connector::api::controller::ChatController;
use mumbai_local::connector::api::container::DEFAULT_TIMEOUT_SECS;
use mumbai_local::connector::api::Router;
use mumbai_local::connector::web;
use mumbai_local::{Commands, Container, ContainerConfig, CredentialSource, ProviderKind};

#[derive(Parser)]
#[command(name = "mumbai-local")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Persona TOML file (defaults to the built-in Mumbai persona)
    #[arg(long, global = true)]
    persona: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "gemini")]
    provider: ProviderKind,

    /// Override the persona's model id
    #[arg(long, global = true)]
    model: Option<String>,

    /// Read the API key from the secrets file (also enabled by MUMBAI_LOCAL_HOSTED)
    #[arg(long, global = true)]
    hosted: bool,

    #[arg(long, global = true)]
    secrets_file: Option<PathBuf>,

    /// .env file to read in local mode (defaults to the nearest .env)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        provider: cli.provider,
        persona_file: cli.persona,
        model: cli.model,
        hosted: cli.hosted || CredentialSource::hosted_from_env(),
        secrets_file: cli.secrets_file,
        env_file: cli.env_file,
        timeout_secs: cli.timeout_secs,
    })?;

    match cli.command {
        Commands::Serve { port, public } => {
            web::serve(Arc::new(container), port, public).await?;
        }
        Commands::Chat => run_chat(&container).await?,
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

async fn run_chat(container: &Container) -> Result<()> {
    let mut chat = ChatController::new(container);
    println!("{}", chat.greeting());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        println!("{}\n", chat.handle_line(&line).await);
    }

    info!("Chat ended after {} exchanges", chat.session().len());
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from(["mumbai-local", "ask", "What", "is", "jugaad?"]).unwrap();
        match cli.command {
            Commands::Ask { question } => assert_eq!(question.join(" "), "What is jugaad?"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["mumbai-local", "ask"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mumbai-local",
            "serve",
            "--port",
            "9000",
            "--provider",
            "mock",
            "--hosted",
        ])
        .unwrap();

        assert_eq!(cli.provider, ProviderKind::Mock);
        assert!(cli.hosted);
        assert!(matches!(cli.command, Commands::Serve { port: 9000, public: false }));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Cli::try_parse_from(["mumbai-local", "--provider", "ollama", "persona"]).is_err());
    }
}
