//! Configuration System
//!
//! Layered configuration for the lineage publisher: built-in defaults, a
//! user-level file, workspace files, then environment overrides. Tests included.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Name this server answers to; requests for other names are rejected
    #[serde(default = "default_server_name")]
    pub server_name: String,

    #[serde(default)]
    pub publisher: PublisherConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_server_name() -> String {
    "lineage-server".to_string()
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            publisher: PublisherConfig::default(),
            context: ContextConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Dispatch and out-topic settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Maximum number of entities built and published concurrently
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// JSON lines file receiving published events (relative to the workspace)
    #[serde(default = "default_out_topic")]
    pub out_topic: PathBuf,
}

fn default_max_workers() -> usize {
    8
}

fn default_out_topic() -> PathBuf {
    PathBuf::from("lineage/out-topic.jsonl")
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            out_topic: default_out_topic(),
        }
    }
}

impl PublisherConfig {
    pub fn out_topic_path(&self, workspace_root: &Path) -> PathBuf {
        resolve(workspace_root, &self.out_topic)
    }
}

/// Context traversal settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum hops followed from the root entity
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Extra type names routed to an existing strategy
    #[serde(default)]
    pub type_aliases: Vec<TypeAlias>,
}

/// Routes `type_name` to the strategy registered for `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub type_name: String,
    pub target: String,
}

fn default_max_depth() -> usize {
    crate::context::DEFAULT_MAX_DEPTH
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            type_aliases: Vec::new(),
        }
    }
}

/// Metadata store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the in-memory store
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

impl StoreConfig {
    pub fn snapshot_path(&self, workspace_root: &Path) -> Option<PathBuf> {
        self.snapshot.as_ref().map(|p| resolve(workspace_root, p))
    }
}

fn resolve(workspace_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Publisher(String),
    Context(String),
    Logging(String),
    System(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Publisher(msg) => write!(f, "Publisher: {}", msg),
            ValidationError::Context(msg) => write!(f, "Context: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::System(msg) => write!(f, "System: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

const KNOWN_STRATEGY_TYPES: &[&str] = &[crate::context::GLOSSARY_TERM, crate::context::PROCESS];

impl LineageConfig {
    /// Validate the entire configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.server_name.trim().is_empty() {
            errors.push(ValidationError::System("server_name cannot be empty".into()));
        }

        if self.publisher.max_workers == 0 {
            errors.push(ValidationError::Publisher(
                "max_workers must be at least 1".into(),
            ));
        }
        if self.publisher.out_topic.as_os_str().is_empty() {
            errors.push(ValidationError::Publisher("out_topic cannot be empty".into()));
        }

        if self.context.max_depth == 0 {
            errors.push(ValidationError::Context("max_depth must be at least 1".into()));
        }
        for alias in &self.context.type_aliases {
            if alias.type_name.trim().is_empty() {
                errors.push(ValidationError::Context("type alias name cannot be empty".into()));
            }
            if !KNOWN_STRATEGY_TYPES.contains(&alias.target.as_str()) {
                errors.push(ValidationError::Context(format!(
                    "type alias '{}' targets '{}', expected one of {}",
                    alias.type_name,
                    alias.target,
                    KNOWN_STRATEGY_TYPES.join(", ")
                )));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
