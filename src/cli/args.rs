//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract values of the given properties into custom properties
//! - `preset`: Same as `extract` with a built-in property list and prefix
//! - `init`: Initialize cssvar configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Preset(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `extract` and `preset`.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to scan (default: current directory)
    pub dir: Option<PathBuf>,

    /// Variable sheet file name, relative to the scanned directory (overrides config file)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Glob pattern selecting style files (overrides config file)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Also write a JSON usage map next to the variable sheet
    #[arg(long)]
    pub map: bool,

    /// Inline referenced images as data URLs and write assets.css
    #[arg(long)]
    pub assets: bool,

    /// Group variables by source folder in the variable sheet
    #[arg(long)]
    pub group_by_folder: bool,

    /// Exit with status 1 when the run produced warnings
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Comma separated properties to extract, e.g. "color,background-color"
    #[arg(short, long)]
    pub properties: Option<String>,

    /// Prefix for generated variable names (overrides config file)
    #[arg(long)]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct PresetCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace property values with var() references and generate a variable sheet
    Extract(ExtractCommand),
    /// Run extract with the built-in theme property list and the "theme" prefix
    Preset(PresetCommand),
    /// Initialize a new .cssvarrc.json configuration file
    Init,
}
