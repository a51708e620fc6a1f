//! CLI parse: clap types for asset-lineage. No behavior; definitions only.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Asset lineage CLI - publish lineage context events for cataloged entities
#[derive(Parser)]
#[command(name = "asset-lineage")]
#[command(about = "Publish lineage context events for cataloged metadata entities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the lineage context of every entity of a type
    PublishEntities {
        /// Entity type name, e.g. GlossaryTerm or Process
        entity_type: String,
        /// Only entities updated after this RFC 3339 instant
        #[arg(long)]
        updated_after: Option<DateTime<Utc>>,
        /// Only entities carrying this classification (repeatable)
        #[arg(long = "classification")]
        classifications: Vec<String>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Publish the lineage context of one entity
    PublishEntity {
        #[command(flatten)]
        entity: EntityArgs,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Publish the asset context of one entity
    PublishAssetContext {
        #[command(flatten)]
        entity: EntityArgs,
        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct EntityArgs {
    /// Entity type name
    pub entity_type: String,
    /// Entity guid
    pub guid: String,
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Caller identity checked by the metadata store
    #[arg(long)]
    pub user: String,
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl Commands {
    pub fn request(&self) -> &RequestArgs {
        match self {
            Commands::PublishEntities { request, .. }
            | Commands::PublishEntity { request, .. }
            | Commands::PublishAssetContext { request, .. } => request,
        }
    }
}
