//! Data model shared across the extraction pipeline.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// A literal value lifted out of a declaration into a custom property.
///
/// Created once per qualifying declaration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVariable {
    pub property: String,
    pub raw_value: String,
    pub variable_name: String,
    pub source_path: PathBuf,
    pub source_line: usize,
}

/// One place where a substituted value was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableUsageRecord {
    pub source_path: String,
    pub source_line: usize,
    pub property: String,
    pub raw_value: String,
}

/// Aggregated usages of a single `(property, raw value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableReport {
    /// Name assigned the first time the key was seen.
    pub variable_name: String,
    pub raw_value: String,
    pub usage_count: usize,
    pub usages: Vec<VariableUsageRecord>,
}

/// Immutable options for one extraction run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory that is scanned and where outputs are written.
    pub target_dir: PathBuf,
    /// Properties whose values get substituted (compared lowercase).
    pub properties: Vec<String>,
    pub prefix: String,
    /// Variable sheet file name, relative to `target_dir`.
    pub output: String,
    /// Glob pattern matched against paths relative to `target_dir`.
    pub pattern: String,
    pub ignores: Vec<String>,
    /// Property name → shorter alias embedded into generated names.
    pub aliases: HashMap<String, String>,
    pub export_map: bool,
    /// Inline image assets as data URLs and write `assets.css`.
    pub export_assets: bool,
    pub group_by_folder: bool,
}

impl RunOptions {
    pub fn is_target_property(&self, property: &str) -> bool {
        let property = property.to_ascii_lowercase();
        self.properties.iter().any(|p| p.eq_ignore_ascii_case(&property))
    }

    pub fn alias_for<'a>(&'a self, property: &'a str) -> &'a str {
        self.aliases
            .get(property)
            .map(String::as_str)
            .unwrap_or(property)
    }
}

/// Non-fatal conditions collected during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// An image referenced by a declaration does not exist on disk.
    MissingAsset {
        source_path: PathBuf,
        source_line: usize,
        asset_path: PathBuf,
    },
    /// An image exists but could not be encoded.
    UnreadableAsset {
        source_path: PathBuf,
        source_line: usize,
        asset_path: PathBuf,
        reason: String,
    },
    /// No plain variables were extracted, so no variable sheet was written.
    NoVariables,
}

impl std::fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractWarning::MissingAsset {
                source_path,
                source_line,
                asset_path,
            } => write!(
                f,
                "{}:{}: image not found: {}",
                source_path.display(),
                source_line,
                asset_path.display()
            ),
            ExtractWarning::UnreadableAsset {
                source_path,
                source_line,
                asset_path,
                reason,
            } => write!(
                f,
                "{}:{}: cannot encode image {}: {}",
                source_path.display(),
                source_line,
                asset_path.display(),
                reason
            ),
            ExtractWarning::NoVariables => {
                write!(f, "no variables were extracted, skipping variable sheet")
            }
        }
    }
}

/// Substitutions made in one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub substitutions: usize,
}

/// Everything a caller needs to know about a finished run.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub files: Vec<FileOutcome>,
    pub variable_count: usize,
    pub asset_variable_count: usize,
    pub report_count: usize,
    /// Variable sheet actually written; differs from the configured name
    /// when that file already existed.
    pub output_file: Option<PathBuf>,
    pub map_file: Option<PathBuf>,
    pub assets_file: Option<PathBuf>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractSummary {
    pub fn files_modified(&self) -> usize {
        self.files.iter().filter(|f| f.substitutions > 0).count()
    }

    pub fn substitution_count(&self) -> usize {
        self.files.iter().map(|f| f.substitutions).sum()
    }
}

/// Render `path` relative to `root` with forward slashes.
pub fn relative_display(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
