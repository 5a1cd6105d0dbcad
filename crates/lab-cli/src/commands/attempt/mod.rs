mod get;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AttemptCommands;
use crate::context::AppContext;

/// Handle `labrun attempt`.
pub async fn handle(
    action: &AttemptCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AttemptCommands::List { participant, limit } => {
            list::run(participant.as_deref(), *limit, ctx, flags).await
        }
        AttemptCommands::Get { id } => get::run(id, ctx, flags).await,
    }
}
