use clap::Subcommand;

/// Catalog inspection.
#[derive(Clone, Debug, Subcommand)]
pub enum CatalogCommands {
    /// List the exercises in a catalog file.
    List {
        /// TOML file with `[[exercises]]` tables.
        file: String,
    },
}
