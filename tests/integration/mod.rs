//! Integration tests for the lineage publication pipeline

mod asset_context;
mod config_integration;
mod publish_by_id;
mod service_api;
mod support;
