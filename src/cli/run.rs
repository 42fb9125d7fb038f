use super::{
    args::{Arguments, Command},
    commands::{CommandResult, extract::extract, init::init, preset::preset},
};
use anyhow::Result;

/// Dispatches to the appropriate command handler based on the parsed arguments.
///
/// # Returns
/// - `Ok(CommandResult)` with the run summary and warning count
/// - `Err` if the command fails (e.g., missing directory, parse errors)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Preset(cmd)) => preset(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
