//! Declaration scanning and value substitution for one document.

use std::path::Path;

use super::{
    assets::{ImageEncoder, data_url, resolve_asset_path},
    classify::{PREPROCESSOR_SIGIL, ValueKind, classify},
    ledger::UsageLedger,
    naming::{DeclarationContext, NameRegistry, NameStrategy},
    stylesheet::{Declaration, DeclarationTree, Dialect},
    types::{ExtractWarning, ExtractedVariable, RunOptions, relative_display},
};

/// SCSS variables are all filed under this property.
pub const PREPROCESSOR_PROPERTY: &str = "color";

/// Accumulated state of one run, threaded through every document.
#[derive(Debug, Default)]
pub struct RunState {
    /// Plain variables, in extraction order.
    pub variables: Vec<ExtractedVariable>,
    /// Inlined images; `raw_value` holds the data URL.
    pub asset_variables: Vec<ExtractedVariable>,
    /// SCSS `$name` definitions; `variable_name` holds `$name`.
    pub preprocessor_variables: Vec<ExtractedVariable>,
    pub names: NameRegistry,
    pub ledger: UsageLedger,
    pub warnings: Vec<ExtractWarning>,
}

pub struct Rewriter<'a> {
    pub options: &'a RunOptions,
    pub encoder: &'a dyn ImageEncoder,
    pub strategy: Option<&'a dyn NameStrategy>,
}

impl Rewriter<'_> {
    /// Substitute every qualifying declaration of `doc`.
    ///
    /// Returns the number of declarations rewritten.
    pub fn rewrite<T: DeclarationTree>(
        &self,
        doc: &mut T,
        source_path: &Path,
        dialect: Dialect,
        state: &mut RunState,
    ) -> usize {
        if dialect == Dialect::Scss {
            collect_preprocessor_variables(doc.declarations(), source_path, state);
        }

        let mut replacements: Vec<(usize, String)> = Vec::new();
        for (index, decl) in doc.declarations().iter().enumerate() {
            if let Some(name) = self.substitute(decl, source_path, state) {
                replacements.push((index, format!("var({})", name)));
            }
        }

        let count = replacements.len();
        for (index, value) in replacements {
            doc.set_value(index, value);
        }
        count
    }

    fn substitute(
        &self,
        decl: &Declaration,
        source_path: &Path,
        state: &mut RunState,
    ) -> Option<String> {
        let value = decl.value.as_str();
        if !self.options.is_target_property(&decl.property)
            || value.starts_with("var(")
            || value.starts_with("--")
        {
            return None;
        }
        if value.contains(PREPROCESSOR_SIGIL) && !self.options.export_assets {
            return None;
        }

        let classified = classify(value, &decl.property, &state.preprocessor_variables);
        let usage_path = relative_display(source_path, &self.options.target_dir);

        let (definition_value, is_asset) = match &classified.kind {
            ValueKind::Transparent => return None,
            ValueKind::ImageUrl(reference) if self.options.export_assets => {
                let asset_path = resolve_asset_path(source_path, reference);
                if !asset_path.exists() {
                    state.warnings.push(ExtractWarning::MissingAsset {
                        source_path: source_path.to_path_buf(),
                        source_line: decl.line,
                        asset_path,
                    });
                    return None;
                }
                match self.encoder.encode(&asset_path) {
                    Ok(encoded) => (data_url(&asset_path, &encoded), true),
                    Err(err) => {
                        state.warnings.push(ExtractWarning::UnreadableAsset {
                            source_path: source_path.to_path_buf(),
                            source_line: decl.line,
                            asset_path,
                            reason: format!("{:#}", err),
                        });
                        return None;
                    }
                }
            }
            _ => (value.to_string(), false),
        };

        let property = decl.property.to_ascii_lowercase();
        let ctx = DeclarationContext {
            root: &self.options.target_dir,
            source_path,
            source_line: decl.line,
            selectors: &decl.selectors,
            kind: &classified.kind,
            token: &classified.token,
            prefix: &self.options.prefix,
            alias: self.options.alias_for(&property),
        };
        // The same relative url may point at different images.
        let reuse_key = if is_asset { definition_value.as_str() } else { value };
        let name = match self.strategy {
            Some(strategy) => state.names.assign_with(strategy, &property, value, &ctx),
            None => state.names.assign(&property, reuse_key, &ctx),
        };

        let variable = ExtractedVariable {
            property: decl.property.clone(),
            raw_value: definition_value,
            variable_name: name.clone(),
            source_path: source_path.to_path_buf(),
            source_line: decl.line,
        };
        if is_asset {
            state.asset_variables.push(variable);
        } else {
            state.variables.push(variable);
        }
        state
            .ledger
            .record(&decl.property, value, &name, &usage_path, decl.line);

        Some(name)
    }
}

fn collect_preprocessor_variables(
    declarations: &[Declaration],
    source_path: &Path,
    state: &mut RunState,
) {
    for decl in declarations {
        if decl.property.starts_with(PREPROCESSOR_SIGIL) {
            state.preprocessor_variables.push(ExtractedVariable {
                property: PREPROCESSOR_PROPERTY.to_string(),
                raw_value: decl.value.clone(),
                variable_name: decl.property.clone(),
                source_path: source_path.to_path_buf(),
                source_line: decl.line,
            });
        }
    }
}
