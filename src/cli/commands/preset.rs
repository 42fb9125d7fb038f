//! Preset command - extract the common theming properties with the
//! `theme` prefix, ignoring the property list and prefix of the config file.

use anyhow::Result;

use super::{
    CommandKind, CommandResult,
    helper::{build_options, finish, load, target_dir},
};
use crate::{
    cli::args::PresetCommand,
    config::{PRESET_PREFIX, PRESET_PROPERTIES},
};

pub fn preset(cmd: PresetCommand) -> Result<CommandResult> {
    let common = &cmd.common;
    let (config, from_file) = load(&target_dir(common))?;

    let properties = PRESET_PROPERTIES.iter().map(|p| p.to_string()).collect();
    let options = build_options(common, config, properties, PRESET_PREFIX.to_string())?;
    finish(CommandKind::Preset, options, from_file, common.strict)
}
