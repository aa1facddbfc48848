use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Interactive terminal chat (newest exchange printed first)
    Chat,

    /// Print the effective persona and system prompt
    Persona,

    /// Serve the single-page web form
    Serve {
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
