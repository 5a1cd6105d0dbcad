use clap::Subcommand;

/// Achievement queries.
#[derive(Clone, Debug, Subcommand)]
pub enum AchievementCommands {
    /// List a participant's achievements in award order.
    List {
        /// Participant ID.
        participant: String,
    },
}
