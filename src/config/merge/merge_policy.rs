//! Merge rules: defaults underneath every other source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server_name", "lineage-server")?
        .set_default("publisher.max_workers", 8_i64)?
        .set_default("publisher.out_topic", "lineage/out-topic.jsonl")?
        .set_default(
            "context.max_depth",
            crate::context::DEFAULT_MAX_DEPTH as i64,
        )
}
