//! Integration tests for configuration driving the publisher

use asset_lineage::config::ConfigLoader;
use asset_lineage::context::ContextBuilder;
use tempfile::TempDir;

#[test]
fn configured_aliases_route_to_existing_strategies() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("lineage.toml");
    std::fs::write(
        &config_file,
        r#"
server_name = "cocoMDS1"

[publisher]
max_workers = 4
out_topic = "topics/lineage.jsonl"

[context]
max_depth = 6

[[context.type_aliases]]
type_name = "DeployedSoftwareComponent"
target = "Process"

[[context.type_aliases]]
type_name = "ControlledGlossaryTerm"
target = "GlossaryTerm"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.publisher.max_workers, 4);
    assert_eq!(config.context.max_depth, 6);
    assert_eq!(config.logging.format, "json");
    assert_eq!(
        config.publisher.out_topic_path(temp_dir.path()),
        temp_dir.path().join("topics/lineage.jsonl")
    );

    let builder = ContextBuilder::from_config(&config.context).unwrap();
    assert!(builder.supports("DeployedSoftwareComponent"));
    assert!(builder.supports("ControlledGlossaryTerm"));
    assert_eq!(
        builder.registry().type_names(),
        vec![
            "ControlledGlossaryTerm",
            "DeployedSoftwareComponent",
            "GlossaryTerm",
            "Process"
        ]
    );
}

#[test]
fn invalid_values_are_reported_together() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("lineage.toml");
    std::fs::write(
        &config_file,
        r#"
[publisher]
max_workers = 0

[logging]
format = "xml"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn malformed_file_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("lineage.toml");
    std::fs::write(&config_file, "[publisher\nmax_workers = ").unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}
