//! CLI domain: parse, route, output, and presentation only.
//! No content logic here; the route table dispatches to the entity handlers.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{command_name, map_error};
pub use parse::{Cli, Commands, ListFormat};
pub use route::RunContext;
