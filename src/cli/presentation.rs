//! CLI presentation: text and json formatters for guid list responses.

use crate::api::GuidListResponse;
use crate::cli::CliError;
use crate::error::LineageError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_response_text(operation: &str, response: &GuidListResponse) -> String {
    if response.guids.is_empty() {
        return format!("{}: nothing published", operation);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Published guid"]);
    for (i, guid) in response.guids.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), guid.clone()]);
    }
    format!("{}: {} published\n\n{}", operation, response.guids.len(), table)
}

pub fn format_response_json(response: &GuidListResponse) -> Result<String, CliError> {
    serde_json::to_string_pretty(response).map_err(|e| {
        CliError::Lineage(LineageError::Publish(crate::error::PublishError::Serialization(e)))
    })
}
