use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, ctx, flags).await,
        Commands::Attempt { action } => commands::attempt::handle(&action, ctx, flags).await,
        Commands::Achievement { action } => {
            commands::achievement::handle(&action, ctx, flags).await
        }
        Commands::Balance(_) | Commands::Catalog { .. } => {
            unreachable!("balance/catalog are pre-dispatched in main")
        }
    }
}
