mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AchievementCommands;
use crate::context::AppContext;

/// Handle `labrun achievement`.
pub async fn handle(
    action: &AchievementCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AchievementCommands::List { participant } => list::run(participant, ctx, flags).await,
    }
}
