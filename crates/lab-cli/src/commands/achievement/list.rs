use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(participant: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let achievements = ctx.service.list_achievements(participant).await?;
    output(&achievements, flags.format)
}
