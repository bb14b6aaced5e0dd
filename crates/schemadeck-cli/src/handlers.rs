//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod describe;
mod list;
mod tour;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use describe::handle_describe;
pub use list::handle_list;
pub use tour::handle_tour;
pub use validate::handle_validate;
