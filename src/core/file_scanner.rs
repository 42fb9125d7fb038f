use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// Compile one glob. A single `*` never matches across `/`.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))
}

pub fn build_globset<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern)?);
    }
    builder.build().context("Failed to build glob set")
}

/// Files under `root` matching `pattern`, in a stable order.
///
/// Entries are visited sorted by file name so repeated runs on the same tree
/// see files in the same order. Paths for which `is_excluded` holds
/// (generated outputs) are never returned.
pub fn scan_files(
    root: &Path,
    pattern: &str,
    ignores: &[String],
    is_excluded: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let includes = build_globset([pattern])?;
    let ignore_set = build_globset(ignores.iter().map(String::as_str))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Cannot access path under {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_excluded(path) {
            continue;
        }
        let rel = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if ignore_set.is_match(&rel) {
            continue;
        }
        if includes.is_match(&rel) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
