//! Asset Lineage: lineage context publication for cataloged metadata
//!
//! Scans a metadata store for entities, builds the relationship context of
//! each one with a type-specific strategy, and publishes the result as an
//! event on an out topic. Per-entity failures are isolated; request-level
//! failures are returned to the caller.

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod logging;
pub mod publish;
pub mod store;
pub mod types;
