//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; the route table forwards to [`crate::api::LineageService`].

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CliError};
pub use parse::{Cli, Commands, EntityArgs, RequestArgs};
pub use presentation::{format_response_json, format_response_text};
pub use route::RunContext;
