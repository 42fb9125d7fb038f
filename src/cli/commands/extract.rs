//! Extract command - substitute values of user-selected properties.

use anyhow::Result;

use super::{
    CommandKind, CommandResult,
    helper::{build_options, finish, load, target_dir},
};
use crate::{cli::args::ExtractCommand, config::parse_property_list};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let common = &cmd.common;
    let (config, from_file) = load(&target_dir(common))?;

    let properties = match &cmd.properties {
        Some(list) => parse_property_list(list),
        None => config.properties.clone(),
    };
    let prefix = cmd.prefix.clone().unwrap_or_else(|| config.prefix.clone());

    let options = build_options(common, config, properties, prefix)?;
    finish(CommandKind::Extract, options, from_file, common.strict)
}
