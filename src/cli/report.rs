//! Report formatting and printing utilities.
//!
//! Separate from core logic to allow cssvar to be used as a library.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use super::commands::{CommandKind, CommandResult, CommandSummary, ExtractReport, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::relative_display;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print a command result: summary to stdout, warnings to stderr.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(
        result,
        verbose,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
}

pub fn print_to<O: Write, E: Write>(result: &CommandResult, verbose: bool, out: &mut O, err: &mut E) {
    match &result.summary {
        CommandSummary::Extract(report) => print_extract(report, result.kind, verbose, out, err),
        CommandSummary::Init(summary) => print_init(summary, out),
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn print_extract<O: Write, E: Write>(
    report: &ExtractReport,
    kind: CommandKind,
    verbose: bool,
    out: &mut O,
    err: &mut E,
) {
    let summary = &report.summary;
    let root = report.root.as_path();

    if verbose {
        if report.config_from_file {
            let _ = writeln!(out, "Using {}", CONFIG_FILE_NAME.cyan());
        }
        for file in &summary.files {
            let _ = writeln!(
                out,
                "  {} {} ({} replaced)",
                "-->".blue(),
                relative_display(&file.path, root),
                file.substitutions
            );
        }
    }

    for warning in &summary.warnings {
        let _ = writeln!(err, "{} {}", "warning:".bold().yellow(), warning);
    }

    let file_count = summary.files.len();
    let Some(output) = &summary.output_file else {
        let _ = writeln!(
            out,
            "Scanned {} {} - nothing to extract",
            file_count,
            plural(file_count, "file", "files")
        );
        print_side_files(report, out);
        return;
    };

    let label = match kind {
        CommandKind::Preset => "Extracted (preset)",
        _ => "Extracted",
    };
    let _ = writeln!(
        out,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "{} {} {} from {} {} into {}",
            label,
            summary.variable_count,
            plural(summary.variable_count, "value", "values"),
            summary.files_modified(),
            plural(summary.files_modified(), "file", "files"),
            relative_display(output, root)
        )
        .green()
    );

    if !is_requested(output, root, &report.requested_output) {
        let _ = writeln!(
            out,
            "  {} {} already exists, wrote {} instead",
            "note:".bold(),
            report.requested_output,
            relative_display(output, root)
        );
    }
    print_side_files(report, out);
}

fn print_side_files<W: Write>(report: &ExtractReport, writer: &mut W) {
    let summary = &report.summary;
    let root = report.root.as_path();

    if let Some(map) = &summary.map_file {
        let _ = writeln!(
            writer,
            "  {} {} ({} {})",
            "usage map:".bold(),
            relative_display(map, root),
            summary.report_count,
            plural(summary.report_count, "entry", "entries")
        );
    }
    if let Some(assets) = &summary.assets_file {
        let _ = writeln!(
            writer,
            "  {} {} ({} {})",
            "assets:".bold(),
            relative_display(assets, root),
            summary.asset_variable_count,
            plural(summary.asset_variable_count, "image", "images")
        );
    }
}

fn is_requested(output: &Path, root: &Path, requested: &str) -> bool {
    output == root.join(requested)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
