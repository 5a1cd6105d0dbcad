use clap::{Args, Subcommand};

use crate::cli::subcommands::{AchievementCommands, AttemptCommands, CatalogCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Replay a lab session script against the configured store.
    Run(RunArgs),
    /// Check or solve a chemical equation.
    Balance(BalanceArgs),
    /// Recorded attempts.
    Attempt {
        #[command(subcommand)]
        action: AttemptCommands,
    },
    /// Awarded achievements.
    Achievement {
        #[command(subcommand)]
        action: AchievementCommands,
    },
    /// Exercise catalogs.
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Session script (TOML) with `[[exercises]]` and a `[session]` table.
    pub script: String,
}

#[derive(Clone, Debug, Args)]
pub struct BalanceArgs {
    /// Equation such as "2H2 + O2 -> 2H2O".
    pub equation: String,
    /// Search for the smallest balancing coefficients instead of checking the given ones.
    #[arg(long)]
    pub solve: bool,
    /// Largest coefficient the solver tries (1 to 20).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub max: u32,
}
