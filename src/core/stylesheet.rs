//! Minimal CSS/SCSS declaration parser and printer.
//!
//! Only what value substitution needs is modelled: a flat list of
//! declarations (property, value, line, enclosing rule preludes) with the
//! byte span of each value. Printing splices replacement values into the
//! original text, so everything else is preserved exactly.

use std::{collections::BTreeMap, ops::Range, path::Path, sync::LazyLock};

use anyhow::{Result, bail};
use regex::Regex;

static PROPERTY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\$[\w-]+|-{0,2}[A-Za-z_][\w-]*)$").unwrap());

static VALUE_FLAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*!\s*(?:important|default|global)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Css,
    Scss,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("scss") => Dialect::Scss,
            _ => Dialect::Css,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    /// Trimmed value without trailing `!important`-style flags.
    pub value: String,
    /// 1-based line of the property name.
    pub line: usize,
    /// Enclosing rule preludes, outermost first.
    pub selectors: Vec<String>,
    value_span: Range<usize>,
    /// Comments inside `value_span`, kept when the value is replaced.
    comments: Vec<Range<usize>>,
}

/// Read/mutate access to the declarations of one parsed document.
pub trait DeclarationTree {
    /// Declarations in document order.
    fn declarations(&self) -> &[Declaration];

    /// Replace the value of the declaration at `index`.
    fn set_value(&mut self, index: usize, value: String);

    /// Serialize the document, including any replaced values.
    fn to_css(&self) -> String;
}

#[derive(Debug)]
pub struct Stylesheet {
    source: String,
    declarations: Vec<Declaration>,
    replacements: BTreeMap<usize, String>,
}

impl Stylesheet {
    pub fn parse(source: &str, dialect: Dialect) -> Result<Self> {
        let declarations = Parser::new(source, dialect).run()?;
        Ok(Self {
            source: source.to_string(),
            declarations,
            replacements: BTreeMap::new(),
        })
    }

    pub fn is_modified(&self) -> bool {
        !self.replacements.is_empty()
    }
}

impl DeclarationTree for Stylesheet {
    fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    fn set_value(&mut self, index: usize, value: String) {
        if index < self.declarations.len() {
            self.replacements.insert(index, value);
        }
    }

    fn to_css(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (&index, value) in &self.replacements {
            let decl = &self.declarations[index];
            out.push_str(&self.source[cursor..decl.value_span.start]);
            out.push_str(value);
            for comment in &decl.comments {
                let text = &self.source[comment.clone()];
                match text.strip_prefix("//") {
                    Some(line) => {
                        out.push_str(" /* ");
                        out.push_str(line.trim());
                        out.push_str(" */");
                    }
                    None => {
                        out.push(' ');
                        out.push_str(text);
                    }
                }
            }
            cursor = decl.value_span.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    dialect: Dialect,
    line_starts: Vec<usize>,
    rules: Vec<String>,
    declarations: Vec<Declaration>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, dialect: Dialect) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            src,
            bytes: src.as_bytes(),
            dialect,
            line_starts,
            rules: Vec::new(),
            declarations: Vec::new(),
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn run(mut self) -> Result<Vec<Declaration>> {
        let len = self.bytes.len();
        let mut i = 0;
        let mut stmt_start = 0;
        let mut parens = 0usize;

        while i < len {
            match self.bytes[i] {
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    let Some(close) = self.src[i + 2..].find("*/") else {
                        bail!("unterminated comment at line {}", self.line_at(i));
                    };
                    let end = i + 2 + close + 2;
                    if self.src[stmt_start..i].trim().is_empty() {
                        stmt_start = end;
                    }
                    i = end;
                    continue;
                }
                b'/' if self.dialect == Dialect::Scss
                    && parens == 0
                    && self.bytes.get(i + 1) == Some(&b'/') =>
                {
                    let end = self.src[i..].find('\n').map_or(len, |n| i + n);
                    if self.src[stmt_start..i].trim().is_empty() {
                        stmt_start = end;
                    }
                    i = end;
                    continue;
                }
                quote @ (b'"' | b'\'') => {
                    i = self.skip_string(i, quote)?;
                    continue;
                }
                b'#' if self.dialect == Dialect::Scss && self.bytes.get(i + 1) == Some(&b'{') => {
                    i = self.skip_interpolation(i)?;
                    continue;
                }
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b'{' if parens == 0 => {
                    let prelude = uncomment(&self.src[stmt_start..i], stmt_start, self.dialect);
                    self.rules.push(prelude.text.trim().to_string());
                    stmt_start = i + 1;
                }
                b';' if parens == 0 => {
                    self.finish_statement(stmt_start, i);
                    stmt_start = i + 1;
                }
                b'}' if parens == 0 => {
                    self.finish_statement(stmt_start, i);
                    if self.rules.pop().is_none() {
                        bail!("unexpected '}}' at line {}", self.line_at(i));
                    }
                    stmt_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        self.finish_statement(stmt_start, len);
        if let Some(open) = self.rules.last() {
            bail!("unclosed block '{}'", open);
        }
        Ok(self.declarations)
    }

    /// Returns the offset just past the closing quote.
    fn skip_string(&self, start: usize, quote: u8) -> Result<usize> {
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return Ok(i + 1),
                _ => i += 1,
            }
        }
        bail!("unterminated string at line {}", self.line_at(start))
    }

    fn skip_interpolation(&self, start: usize) -> Result<usize> {
        let mut depth = 0usize;
        for (offset, &b) in self.bytes[start + 1..].iter().enumerate() {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(start + 1 + offset + 1);
                    }
                }
                _ => {}
            }
        }
        bail!("unterminated interpolation at line {}", self.line_at(start))
    }

    fn finish_statement(&mut self, start: usize, end: usize) {
        let src = self.src;
        let text = &src[start..end];
        let trimmed = text.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('@') {
            return;
        }
        let Some(colon) = top_level_colon(text) else {
            return;
        };

        let property = text[..colon].trim();
        if !PROPERTY_REGEX.is_match(property) {
            return;
        }

        let raw = uncomment(&text[colon + 1..], start + colon + 1, self.dialect);
        let unpadded = raw.text.trim_start();
        let lead = raw.text.len() - unpadded.len();
        let mut value = unpadded.trim_end();
        while let Some(flag) = VALUE_FLAG_REGEX.find(value) {
            value = value[..flag.start()].trim_end();
        }
        if value.is_empty() {
            return;
        }
        let value_span = raw.offsets[lead]..raw.offsets[lead + value.len() - 1] + 1;
        let value = value.to_string();
        let comments = raw
            .comments
            .into_iter()
            .filter(|c| c.start >= value_span.start && c.end <= value_span.end)
            .collect();

        let property_start = start + (text.len() - trimmed.len());
        self.declarations.push(Declaration {
            property: property.to_string(),
            value,
            line: self.line_at(property_start),
            selectors: self.rules.clone(),
            value_span,
            comments,
        });
    }
}

/// Text with comments cut out, mapped back to source offsets.
struct Uncommented {
    text: String,
    /// Source offset of each byte of `text`.
    offsets: Vec<usize>,
    comments: Vec<Range<usize>>,
}

/// Remove comments from `text`, which starts at source offset `base`.
///
/// A comment between two non-blank characters leaves a single space so
/// `1px/**/solid` still reads as two tokens.
fn uncomment(text: &str, base: usize, dialect: Dialect) -> Uncommented {
    let bytes = text.as_bytes();
    let mut kept = Vec::with_capacity(bytes.len());
    let mut offsets = Vec::with_capacity(bytes.len());
    let mut comments = Vec::new();
    let mut parens = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let comment_end = match (quote, b) {
            (None, b'/') if bytes.get(i + 1) == Some(&b'*') => {
                Some(text[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2))
            }
            (None, b'/')
                if dialect == Dialect::Scss && parens == 0 && bytes.get(i + 1) == Some(&b'/') =>
            {
                Some(text[i..].find('\n').map_or(bytes.len(), |n| i + n))
            }
            _ => None,
        };
        if let Some(end) = comment_end {
            comments.push(base + i..base + end);
            let before = kept.last().is_some_and(|c: &u8| !c.is_ascii_whitespace());
            let after = bytes.get(end).is_some_and(|c| !c.is_ascii_whitespace());
            if before && after {
                kept.push(b' ');
                offsets.push(base + i);
            }
            i = end;
            continue;
        }

        match (quote, b) {
            (Some(_), b'\\') if i + 1 < bytes.len() => {
                kept.extend_from_slice(&bytes[i..i + 2]);
                offsets.extend([base + i, base + i + 1]);
                i += 2;
                continue;
            }
            (Some(q), _) if b == q => quote = None,
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'(') => parens += 1,
            (None, b')') => parens = parens.saturating_sub(1),
            _ => {}
        }
        kept.push(b);
        offsets.push(base + i);
        i += 1;
    }

    Uncommented {
        text: String::from_utf8_lossy(&kept).into_owned(),
        offsets,
        comments,
    }
}

/// Offset of the first `:` outside parentheses and quotes.
fn top_level_colon(text: &str) -> Option<usize> {
    let mut parens = 0usize;
    let mut quote: Option<u8> = None;
    for (i, b) in text.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'(') => parens += 1,
            (None, b')') => parens = parens.saturating_sub(1),
            (None, b':') if parens == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
