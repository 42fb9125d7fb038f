//! Image inlining.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use base64::prelude::*;

/// Turns an image file into base64 text.
pub trait ImageEncoder {
    fn encode(&self, path: &Path) -> Result<String>;
}

/// Reads the file and encodes its raw bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Encoder;

impl ImageEncoder for Base64Encoder {
    fn encode(&self, path: &Path) -> Result<String> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
        Ok(BASE64_STANDARD.encode(bytes))
    }
}

/// `url(data:image/{ext};base64,{data})` for an encoded image.
pub fn data_url(path: &Path, encoded: &str) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    format!("url(data:image/{};base64,{})", ext, encoded)
}

/// Resolve an image reference against the directory of the declaring file.
///
/// Query strings and fragments (`icon.svg#id`, `a.png?v=2`) are dropped.
pub fn resolve_asset_path(source_path: &Path, reference: &str) -> PathBuf {
    let reference = reference.split(['?', '#']).next().unwrap_or(reference);
    let base = source_path.parent().unwrap_or_else(|| Path::new(""));
    base.join(reference)
}
