mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CatalogCommands;

/// Handle `labrun catalog`. Needs no store.
pub fn handle(action: &CatalogCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CatalogCommands::List { file } => list::run(file, flags),
    }
}
