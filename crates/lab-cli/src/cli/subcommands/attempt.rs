use clap::Subcommand;

/// Attempt queries.
#[derive(Clone, Debug, Subcommand)]
pub enum AttemptCommands {
    /// List attempts, newest first.
    List {
        /// Only attempts by this participant.
        #[arg(long)]
        participant: Option<String>,
        /// Maximum number of attempts.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get one attempt with its notebook.
    Get {
        /// Attempt ID.
        id: String,
    },
}
