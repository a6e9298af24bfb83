//! Command trait definition for CLI commands.
//!
//! Every subcommand implements [`Command`]; `enum_dispatch` forwards calls from the
//! subcommand enum to the selected variant.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all mecluster CLI commands.
///
/// The `command_line` parameter contains the full command invocation for `@PG` records.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
