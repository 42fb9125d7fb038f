use std::path::PathBuf;

use crate::core::ExtractSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Preset,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractReport),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractReport {
    /// Canonical scanned directory.
    pub root: PathBuf,
    /// Output file name that was requested.
    pub requested_output: String,
    /// True if a config file contributed to the options.
    pub config_from_file: bool,
    pub summary: ExtractSummary,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running cssvar commands
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when warning_count > 0.
    pub exit_on_warnings: bool,
}
