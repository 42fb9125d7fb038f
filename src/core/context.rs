use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, bail};

use super::{
    assemble::{ASSETS_FILE_NAME, write_outputs},
    assets::{Base64Encoder, ImageEncoder},
    file_scanner::scan_files,
    naming::NameStrategy,
    rewrite::{RunState, Rewriter},
    stylesheet::{DeclarationTree, Dialect, Stylesheet},
    types::{ExtractSummary, FileOutcome, RunOptions},
};

/// Orchestrates one extraction run.
///
/// Files are processed one at a time in discovery order. Generated names
/// depend on what was extracted before, so the order is part of the result.
///
/// # Failure behaviour
///
/// Any read, parse or write error aborts the run. Files rewritten before the
/// failing one stay rewritten.
pub struct ExtractContext {
    pub options: RunOptions,
    encoder: Box<dyn ImageEncoder>,
    strategy: Option<Box<dyn NameStrategy>>,
}

impl ExtractContext {
    /// Fails if the target directory does not exist, before anything is read.
    pub fn new(mut options: RunOptions) -> Result<Self> {
        if !options.target_dir.is_dir() {
            bail!(
                "Target directory does not exist: {}",
                options.target_dir.display()
            );
        }
        options.target_dir = options.target_dir.canonicalize().with_context(|| {
            format!("Failed to resolve directory: {}", options.target_dir.display())
        })?;

        Ok(Self {
            options,
            encoder: Box::new(Base64Encoder),
            strategy: None,
        })
    }

    pub fn with_encoder(mut self, encoder: impl ImageEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// Replace the default naming scheme.
    pub fn with_name_strategy(mut self, strategy: impl NameStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    pub fn root(&self) -> &Path {
        &self.options.target_dir
    }

    /// Candidate files in processing order.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        scan_files(
            self.root(),
            &self.options.pattern,
            &self.options.ignores,
            |path| self.is_generated_output(path),
        )
    }

    /// Outputs of earlier runs: `variables.css`, `variables-N.css`,
    /// `assets.css` at the root.
    fn is_generated_output(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let requested = self.root().join(&self.options.output);
        if path == requested || path == self.root().join(ASSETS_FILE_NAME) {
            return true;
        }
        if path.parent() != requested.parent() {
            return false;
        }

        let requested_stem = requested
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let requested_ext = requested.extension().and_then(|e| e.to_str());
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (name, None),
        };
        ext == requested_ext
            && stem
                .strip_prefix(requested_stem)
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }

    /// Run the whole pipeline and write every output.
    pub fn extract(&self) -> Result<ExtractSummary> {
        let files = self.files()?;
        let rewriter = Rewriter {
            options: &self.options,
            encoder: self.encoder.as_ref(),
            strategy: self.strategy.as_deref(),
        };

        let mut state = RunState::default();
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let substitutions = self.process_file(&rewriter, &path, &mut state)?;
            outcomes.push(FileOutcome {
                path,
                substitutions,
            });
        }

        let written = write_outputs(&state, &self.options)?;

        let mut warnings = state.warnings;
        warnings.extend(written.warnings);
        Ok(ExtractSummary {
            files: outcomes,
            variable_count: state.variables.len(),
            asset_variable_count: state.asset_variables.len(),
            report_count: state.ledger.len(),
            output_file: written.output_file,
            map_file: written.map_file,
            assets_file: written.assets_file,
            warnings,
        })
    }

    fn process_file(&self, rewriter: &Rewriter<'_>, path: &Path, state: &mut RunState) -> Result<usize> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let dialect = Dialect::from_path(path);
        let mut sheet = Stylesheet::parse(&source, dialect)
            .with_context(|| format!("Failed to parse file: {}", path.display()))?;

        let substitutions = rewriter.rewrite(&mut sheet, path, dialect, state);
        if sheet.is_modified() {
            fs::write(path, sheet.to_css())
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        Ok(substitutions)
    }
}
