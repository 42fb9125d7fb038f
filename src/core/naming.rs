//! Variable name generation.
//!
//! The default scheme is
//! `--{prefix}-{folder}-{class}-{token}-{property alias}`, where every
//! segment except the property is dropped when empty. `folder` is the
//! immediate parent directory of the source file (omitted at the scan root)
//! and `class` is the nearest class selector among the enclosing rules.
//!
//! The [`NameRegistry`] hands out each name at most once. A repeated
//! `(property, value)` pair in the same context gets its earlier name back;
//! any other clash is resolved by appending `-1`, `-2`, ... .

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use super::classify::ValueKind;

static CLASS_SELECTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(-?[A-Za-z_][\w-]*)").unwrap());

/// Everything known about a declaration when a name is requested.
#[derive(Debug, Clone)]
pub struct DeclarationContext<'a> {
    pub root: &'a Path,
    pub source_path: &'a Path,
    pub source_line: usize,
    /// Enclosing rule preludes, outermost first.
    pub selectors: &'a [String],
    pub kind: &'a ValueKind,
    /// Canonical token from the classifier.
    pub token: &'a str,
    pub prefix: &'a str,
    /// Property name after alias lookup.
    pub alias: &'a str,
}

/// Pluggable replacement for the default naming scheme.
///
/// Names returned by a custom strategy are used as-is; the registry does not
/// run its collision loop on them. Strategies that need unique names can
/// build on [`base_name`] and keep their own bookkeeping.
pub trait NameStrategy {
    fn name(&self, property: &str, raw_value: &str, ctx: &DeclarationContext<'_>) -> String;
}

impl<F> NameStrategy for F
where
    F: Fn(&str, &str, &DeclarationContext<'_>) -> String,
{
    fn name(&self, property: &str, raw_value: &str, ctx: &DeclarationContext<'_>) -> String {
        self(property, raw_value, ctx)
    }
}

/// Name composed from the context alone, before collision handling.
pub fn base_name(ctx: &DeclarationContext<'_>) -> String {
    let folder = folder_segment(ctx.root, ctx.source_path);
    let class = nearest_class(ctx.selectors).unwrap_or_default();

    let segments: Vec<&str> = [ctx.prefix, folder.as_str(), class.as_str(), ctx.token, ctx.alias]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    format!("--{}", segments.join("-"))
}

/// Parent directory name of `source_path`, or empty when it sits in `root`.
pub fn folder_segment(root: &Path, source_path: &Path) -> String {
    let Some(parent) = source_path.parent() else {
        return String::new();
    };
    if parent == root || parent.strip_prefix(root).is_err() {
        return String::new();
    }
    parent
        .file_name()
        .map(|name| sanitize_segment(&name.to_string_lossy()))
        .unwrap_or_default()
}

/// First class name found walking from the innermost rule outwards.
pub fn nearest_class(selectors: &[String]) -> Option<String> {
    selectors.iter().rev().find_map(|selector| {
        CLASS_SELECTOR_REGEX
            .captures(selector)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn sanitize_segment(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Running set of names assigned during one run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
    /// `(property, raw value, base name)` → assigned name.
    assigned: HashMap<(String, String, String), String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name with the default scheme.
    pub fn assign(&mut self, property: &str, raw_value: &str, ctx: &DeclarationContext<'_>) -> String {
        let base = base_name(ctx);
        let key = (property.to_string(), raw_value.to_string(), base);
        if let Some(existing) = self.assigned.get(&key) {
            return existing.clone();
        }

        let name = self.next_free(&key.2);
        self.taken.insert(name.clone());
        self.assigned.insert(key, name.clone());
        name
    }

    /// Resolve a name with a custom strategy, trusting its output.
    pub fn assign_with(
        &mut self,
        strategy: &dyn NameStrategy,
        property: &str,
        raw_value: &str,
        ctx: &DeclarationContext<'_>,
    ) -> String {
        let name = strategy.name(property, raw_value, ctx);
        self.taken.insert(name.clone());
        name
    }

    fn next_free(&self, base: &str) -> String {
        if !self.taken.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
