//! Command-line interface.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{handle_delete, handle_generate, handle_list, handle_publish, handle_show};
