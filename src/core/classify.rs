//! Value classification and normalization.
//!
//! Turns a raw declaration value into a [`ValueKind`] plus a canonical token
//! that can be embedded into a generated variable name. Rules are checked in
//! a fixed priority order and the first match wins:
//!
//! 1. quoted string
//! 2. preprocessor variable reference (`$name`)
//! 3. gradient
//! 4. `transparent`
//! 5. image reference
//! 6. anything else

use std::sync::LazyLock;

use regex::Regex;

use super::types::ExtractedVariable;

/// Upper bound on the length of a canonical token.
pub const MAX_TOKEN_LEN: usize = 32;

/// Sigil that starts a SCSS variable.
pub const PREPROCESSOR_SIGIL: char = '$';

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico", "avif",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    StringLiteral,
    PreprocessorRef,
    Gradient,
    /// Carries the referenced path, unwrapped from any `url(...)`.
    ImageUrl(String),
    Transparent,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ValueKind,
    pub token: String,
}

static GRADIENT_FN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(linear|radial|conic)-gradient").unwrap());

static COLOR_LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)").unwrap()
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^url\(\s*['"]?([^'")]+?)['"]?\s*\)$"#).unwrap());

static BARE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w@~.\-/]+\.[A-Za-z0-9]+$").unwrap());

/// Classify a value. `known` holds the preprocessor variables seen so far
/// and is only consulted for `$name` references.
pub fn classify(raw_value: &str, property: &str, known: &[ExtractedVariable]) -> Classified {
    let value = raw_value.trim();

    if value.starts_with('"') || value.starts_with('\'') {
        let content = value.trim_matches(|c| c == '"' || c == '\'');
        return Classified {
            kind: ValueKind::StringLiteral,
            token: truncate(replace_non_alphanumeric(content, '-')),
        };
    }

    if let Some(name) = value.strip_prefix(PREPROCESSOR_SIGIL) {
        let name = preprocessor_name(name);
        let token = match resolve_preprocessor(name, property, known) {
            Some(resolved) => alphanumeric_only(resolved.trim_start_matches('#')),
            None => name.to_string(),
        };
        return Classified {
            kind: ValueKind::PreprocessorRef,
            token: truncate(token),
        };
    }

    if value.contains("gradient") {
        return Classified {
            kind: ValueKind::Gradient,
            token: gradient_token(value),
        };
    }

    if value.eq_ignore_ascii_case("transparent") {
        return Classified {
            kind: ValueKind::Transparent,
            token: String::new(),
        };
    }

    if let Some(path) = image_path(value) {
        let stem = path
            .rsplit('/')
            .next()
            .and_then(|file| file.split('.').next())
            .unwrap_or_default();
        return Classified {
            token: truncate(alphanumeric_only(stem)),
            kind: ValueKind::ImageUrl(path),
        };
    }

    Classified {
        kind: ValueKind::Plain,
        token: truncate(alphanumeric_only(value.trim_start_matches('#'))),
    }
}

/// The identifier part of a `$name` reference, without trailing operators.
fn preprocessor_name(rest: &str) -> &str {
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    &rest[..end]
}

fn resolve_preprocessor<'a>(
    name: &str,
    property: &str,
    known: &'a [ExtractedVariable],
) -> Option<&'a str> {
    known
        .iter()
        .rev()
        .find(|var| {
            var.property == property
                && var.variable_name.strip_prefix(PREPROCESSOR_SIGIL) == Some(name)
        })
        .map(|var| var.raw_value.as_str())
}

fn gradient_token(value: &str) -> String {
    let function = GRADIENT_FN_REGEX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "gradient".to_string());

    let arguments = value
        .find('(')
        .map(|open| &value[open + 1..])
        .unwrap_or_default();
    let colors: String = COLOR_LITERAL_REGEX
        .find_iter(arguments)
        .map(|m| alphanumeric_only(m.as_str()))
        .collect();

    truncate(format!("{}{}", function, colors))
}

/// Path referenced by an image value, if the value is one.
pub fn image_path(value: &str) -> Option<String> {
    let candidate = match URL_REGEX.captures(value) {
        Some(caps) => caps.get(1)?.as_str().trim(),
        None if BARE_PATH_REGEX.is_match(value) => value,
        None => return None,
    };

    if candidate.starts_with("data:") || candidate.contains("://") || candidate.starts_with("//")
    {
        return None;
    }

    let extension = candidate
        .split(['?', '#'])
        .next()?
        .rsplit_once('.')?
        .1
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then(|| candidate.to_string())
}

pub fn alphanumeric_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn replace_non_alphanumeric(text: &str, with: char) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { with })
        .collect()
}

fn truncate(mut token: String) -> String {
    // Tokens are ASCII by construction.
    token.truncate(MAX_TOKEN_LEN);
    token
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn scss_var(name: &str, value: &str) -> ExtractedVariable {
        ExtractedVariable {
            property: "color".to_string(),
            raw_value: value.to_string(),
            variable_name: name.to_string(),
            source_path: PathBuf::from("/p/_vars.scss"),
            source_line: 1,
        }
    }

    #[test]
    fn test_plain_hex_color() {
        let c = classify("#ff0000", "color", &[]);
        assert_eq!(c.kind, ValueKind::Plain);
        assert_eq!(c.token, "ff0000");
    }

    #[test]
    fn test_plain_composite_strips_punctuation() {
        let c = classify("0 2px 4px rgba(0, 0, 0, .1)", "box-shadow", &[]);
        assert_eq!(c.kind, ValueKind::Plain);
        assert_eq!(c.token, "02px4pxrgba0001");
    }

    #[test]
    fn test_string_literal() {
        let c = classify("\"Helvetica Neue\"", "font-family", &[]);
        assert_eq!(c.kind, ValueKind::StringLiteral);
        assert_eq!(c.token, "Helvetica-Neue");
    }

    #[test]
    fn test_preprocessor_ref_resolved() {
        let known = vec![scss_var("$primary", "#3366ff")];
        let c = classify("$primary", "color", &known);
        assert_eq!(c.kind, ValueKind::PreprocessorRef);
        assert_eq!(c.token, "3366ff");
    }

    #[test]
    fn test_preprocessor_ref_other_property_is_unresolved() {
        let known = vec![scss_var("$primary", "#3366ff")];
        let c = classify("$primary", "background", &known);
        assert_eq!(c.kind, ValueKind::PreprocessorRef);
        assert_eq!(c.token, "primary");
    }

    #[test]
    fn test_preprocessor_latest_definition_wins() {
        let known = vec![scss_var("$primary", "#111"), scss_var("$primary", "#222")];
        let c = classify("$primary", "color", &known);
        assert_eq!(c.token, "222");
    }

    #[test]
    fn test_gradient_token() {
        let c = classify(
            "linear-gradient(to right, #ff0000, rgba(0,255,0,0.5))",
            "background",
            &[],
        );
        assert_eq!(c.kind, ValueKind::Gradient);
        assert_eq!(c.token, "linearff0000rgba0255005");
    }

    #[test]
    fn test_gradient_token_is_bounded() {
        let c = classify(
            "radial-gradient(circle, #111111, #222222, #333333, #444444, #555555)",
            "background",
            &[],
        );
        assert_eq!(c.token.len(), MAX_TOKEN_LEN);
        assert!(c.token.starts_with("radial111111"));
    }

    #[test]
    fn test_gradient_with_quotes_is_still_gradient() {
        let c = classify("linear-gradient(\"x\", #fff, #000)", "background", &[]);
        assert_eq!(c.kind, ValueKind::Gradient);
        assert_eq!(c.token, "linearfff000");
    }

    #[test]
    fn test_transparent_any_case() {
        assert_eq!(classify("transparent", "color", &[]).kind, ValueKind::Transparent);
        assert_eq!(classify("TRANSPARENT", "color", &[]).kind, ValueKind::Transparent);
    }

    #[test]
    fn test_image_url() {
        let c = classify("url(./img/icon.png)", "background-image", &[]);
        assert_eq!(c.kind, ValueKind::ImageUrl("./img/icon.png".to_string()));
        assert_eq!(c.token, "icon");

        let c = classify("url('logo.SVG')", "background-image", &[]);
        assert_eq!(c.kind, ValueKind::ImageUrl("logo.SVG".to_string()));
    }

    #[test]
    fn test_bare_image_path() {
        let c = classify("assets/bg.jpg", "background-image", &[]);
        assert_eq!(c.kind, ValueKind::ImageUrl("assets/bg.jpg".to_string()));
    }

    #[test]
    fn test_remote_and_data_urls_are_plain() {
        assert_eq!(
            classify("url(https://cdn.example.com/a.png)", "background", &[]).kind,
            ValueKind::Plain
        );
        assert_eq!(
            classify("url(data:image/png;base64,AAAA)", "background", &[]).kind,
            ValueKind::Plain
        );
        assert_eq!(
            classify("url(./font.woff2)", "src", &[]).kind,
            ValueKind::Plain
        );
    }

    #[test]
    fn test_empty_value_degrades_to_empty_token() {
        let c = classify("", "color", &[]);
        assert_eq!(c.kind, ValueKind::Plain);
        assert_eq!(c.token, "");
    }
}
