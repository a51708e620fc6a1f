//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::api::ErrorDescriptor;
use crate::error::LineageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Lineage(#[from] LineageError),

    /// A request answered with an error descriptor.
    #[error("{} ({}): {}", .0.kind, .0.http_code, .0.message)]
    Request(ErrorDescriptor),
}

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Lineage(inner) => format!("Error: {}", inner),
        CliError::Request(_) => format!("Request failed: {}", e),
    }
}
