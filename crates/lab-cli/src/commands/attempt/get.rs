use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let attempt = ctx
        .service
        .get_attempt(id)
        .await
        .with_context(|| format!("attempt '{id}' not found"))?;
    output(&attempt, flags.format)
}
