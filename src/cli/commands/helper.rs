use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::{CommandKind, CommandResult, CommandSummary, ExtractReport};
use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{ExtractContext, RunOptions},
};

/// Target directory from the arguments, defaulting to the working directory.
pub fn target_dir(common: &CommonArgs) -> PathBuf {
    common.dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Fail before any config lookup or file access when the target is missing.
pub fn ensure_target_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Target directory does not exist: {}", dir.display());
    }
    Ok(())
}

/// Load the config file for `dir`, if any.
pub fn load(dir: &Path) -> Result<(Config, bool)> {
    ensure_target_dir(dir)?;
    let loaded = load_config(dir)?;
    Ok((loaded.config, loaded.from_file))
}

/// Merge CLI flags over the config file. `properties` and `prefix` are
/// resolved by the calling command.
pub fn build_options(
    common: &CommonArgs,
    config: Config,
    properties: Vec<String>,
    prefix: String,
) -> Result<RunOptions> {
    if properties.is_empty() {
        bail!("No properties to extract. Pass --properties or set 'properties' in the config file.");
    }

    Ok(RunOptions {
        target_dir: target_dir(common),
        properties,
        prefix,
        output: common.output.clone().unwrap_or(config.output),
        pattern: common.pattern.clone().unwrap_or(config.pattern),
        ignores: config.ignores,
        aliases: config.aliases,
        export_map: common.map || config.export_map,
        export_assets: common.assets || config.export_assets,
        group_by_folder: common.group_by_folder || config.group_by_folder,
    })
}

/// Run the extraction and wrap the summary for reporting.
pub fn finish(
    kind: CommandKind,
    options: RunOptions,
    config_from_file: bool,
    strict: bool,
) -> Result<CommandResult> {
    let requested_output = options.output.clone();
    let ctx = ExtractContext::new(options)?;
    let summary = ctx.extract()?;

    Ok(CommandResult {
        kind,
        warning_count: summary.warnings.len(),
        exit_on_warnings: strict,
        summary: CommandSummary::Extract(ExtractReport {
            root: ctx.root().to_path_buf(),
            requested_output,
            config_from_file,
            summary,
        }),
    })
}
