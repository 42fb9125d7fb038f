//! Output assembly: variable sheet, usage map and asset sheet.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::{
    ledger::UsageLedger,
    rewrite::RunState,
    types::{ExtractWarning, ExtractedVariable, RunOptions, relative_display},
};

pub const ASSETS_FILE_NAME: &str = "assets.css";

/// Section label for files sitting directly in the scan root.
pub const ROOT_GROUP_LABEL: &str = "root";

const ASSETS_COMMENT: &str = "资源变量";

/// Paths written by [`write_outputs`].
#[derive(Debug, Default)]
pub struct WrittenOutputs {
    pub output_file: Option<PathBuf>,
    pub map_file: Option<PathBuf>,
    pub assets_file: Option<PathBuf>,
    pub warnings: Vec<ExtractWarning>,
}

struct Definition<'a> {
    name: &'a str,
    value: &'a str,
    group: String,
}

/// Collapse entries sharing a name. The first occurrence fixes the position,
/// the last one provides the value.
fn dedup<'a>(
    variables: &'a [ExtractedVariable],
    group_of: impl Fn(&ExtractedVariable) -> String,
) -> Vec<Definition<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut definitions: Vec<Definition<'a>> = Vec::new();

    for var in variables {
        match index.get(var.variable_name.as_str()) {
            Some(&slot) => definitions[slot].value = &var.raw_value,
            None => {
                index.insert(&var.variable_name, definitions.len());
                definitions.push(Definition {
                    name: &var.variable_name,
                    value: &var.raw_value,
                    group: group_of(var),
                });
            }
        }
    }
    definitions
}

/// Folder of `path` relative to `root`, or [`ROOT_GROUP_LABEL`].
pub fn folder_group(path: &Path, root: &Path) -> String {
    let folder = path
        .parent()
        .map(|parent| relative_display(parent, root))
        .unwrap_or_default();
    if folder.is_empty() {
        ROOT_GROUP_LABEL.to_string()
    } else {
        folder
    }
}

/// Render the `:root { ... }` variable sheet.
pub fn render_variables(variables: &[ExtractedVariable], root: &Path, group_by_folder: bool) -> String {
    let definitions = dedup(variables, |var| {
        if group_by_folder {
            folder_group(&var.source_path, root)
        } else {
            String::new()
        }
    });

    let mut out = String::from(":root {\n");
    if group_by_folder {
        let mut groups: Vec<&str> = Vec::new();
        for def in &definitions {
            if !groups.contains(&def.group.as_str()) {
                groups.push(&def.group);
            }
        }
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("  /* {} */\n", group));
            for def in definitions.iter().filter(|d| d.group == *group) {
                out.push_str(&format!("  {}: {};\n", def.name, def.value));
            }
        }
    } else {
        for def in &definitions {
            out.push_str(&format!("  {}: {};\n", def.name, def.value));
        }
    }
    out.push_str("}\n");
    out
}

pub fn render_assets(asset_variables: &[ExtractedVariable]) -> String {
    let mut out = format!(":root {{\n  /* {} */\n", ASSETS_COMMENT);
    for def in dedup(asset_variables, |_| String::new()) {
        out.push_str(&format!("  {}: {};\n", def.name, def.value));
    }
    out.push_str("}\n");
    out
}

/// JSON object keyed by `property:raw value`, one entry per report.
pub fn render_usage_map(ledger: &UsageLedger) -> Result<String> {
    let mut map = Map::new();
    for (key, report) in ledger.report() {
        let value = serde_json::to_value(report).context("Failed to serialize usage report")?;
        map.insert(key.to_string(), value);
    }
    let content =
        serde_json::to_string_pretty(&Value::Object(map)).context("Failed to serialize JSON")?;
    Ok(format!("{}\n", content))
}

/// First path in `dir` not already taken, starting with `file_name` and
/// then `{stem}-1{ext}`, `{stem}-2{ext}`, ...
pub fn available_output_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let requested = Path::new(file_name);
    let stem = requested
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = requested
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = requested.parent().unwrap_or_else(|| Path::new(""));

    (1..)
        .map(|n| dir.join(parent).join(format!("{}-{}{}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// `variables.css` → `variables.map.json`, next to the sheet.
pub fn map_path_for(sheet: &Path) -> PathBuf {
    let stem = sheet
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sheet.with_file_name(format!("{}.map.json", stem))
}

/// Write every enabled artifact for a finished run.
pub fn write_outputs(state: &RunState, options: &RunOptions) -> Result<WrittenOutputs> {
    let mut written = WrittenOutputs::default();
    let root = &options.target_dir;

    let sheet_path = if state.variables.is_empty() {
        written.warnings.push(ExtractWarning::NoVariables);
        None
    } else {
        let path = available_output_path(root, &options.output);
        let content = render_variables(&state.variables, root, options.group_by_folder);
        write_file(&path, &content)?;
        Some(path)
    };

    if options.export_map {
        let path = map_path_for(
            sheet_path
                .as_deref()
                .unwrap_or(&root.join(&options.output)),
        );
        write_file(&path, &render_usage_map(&state.ledger)?)?;
        written.map_file = Some(path);
    }

    if options.export_assets && !state.asset_variables.is_empty() {
        let path = root.join(ASSETS_FILE_NAME);
        write_file(&path, &render_assets(&state.asset_variables))?;
        written.assets_file = Some(path);
    }

    written.output_file = sheet_path;
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
