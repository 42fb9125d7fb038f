use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::file_scanner::compile_glob;

pub const CONFIG_FILE_NAME: &str = ".cssvarrc.json";

/// Properties handled by `cssvar preset`.
pub const PRESET_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "background",
    "background-image",
    "border-color",
    "font-size",
    "font-family",
    "box-shadow",
    "border-radius",
];

/// Prefix used by `cssvar preset`.
pub const PRESET_PREFIX: &str = "theme";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_properties")]
    pub properties: Vec<String>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub export_map: bool,
    #[serde(default)]
    pub export_assets: bool,
    #[serde(default)]
    pub group_by_folder: bool,
    #[serde(default = "default_aliases")]
    pub aliases: HashMap<String, String>,
}

fn default_properties() -> Vec<String> {
    ["color", "background-color", "background", "border-color"]
        .map(String::from)
        .to_vec()
}

fn default_prefix() -> String {
    "var".to_string()
}

fn default_output() -> String {
    "variables.css".to_string()
}

fn default_pattern() -> String {
    "**/*.{css,scss}".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

pub fn default_aliases() -> HashMap<String, String> {
    [
        ("background-color", "bg-color"),
        ("background", "bg"),
        ("background-image", "bg-image"),
        ("font-size", "fs"),
        ("font-family", "font"),
        ("font-weight", "fw"),
        ("line-height", "lh"),
        ("border-radius", "radius"),
        ("box-shadow", "shadow"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            properties: default_properties(),
            prefix: default_prefix(),
            output: default_output(),
            pattern: default_pattern(),
            ignores: default_ignores(),
            export_map: false,
            export_assets: false,
            group_by_folder: false,
            aliases: default_aliases(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if the property list is empty, the output name is
    /// empty, or any glob pattern is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.properties.iter().all(|p| p.trim().is_empty()) {
            bail!("'properties' must name at least one property");
        }
        if self.output.trim().is_empty() {
            bail!("'output' must not be empty");
        }

        compile_glob(&self.pattern)
            .with_context(|| format!("Invalid glob pattern in 'pattern': \"{}\"", self.pattern))?;
        for pattern in &self.ignores {
            compile_glob(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

/// Split a comma separated property list, dropping blanks.
pub fn parse_property_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
