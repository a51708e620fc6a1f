//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string used in log fields (e.g. "publish_entities").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::PublishEntities { .. } => "publish_entities",
        Commands::PublishEntity { .. } => "publish_entity",
        Commands::PublishAssetContext { .. } => "publish_asset_context",
    }
}
