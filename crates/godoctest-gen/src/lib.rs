//! Table-driven Go test generation from `@test` doc-comment tables.
//!
//! The pipeline for one directory:
//! scan (pair functions with annotation blocks), extract signatures,
//! tokenize literal tables, assemble `TestSpec`s, render, then normalize
//! imports. Parse failures abort the run, per-declaration failures are
//! collected, render failures suppress one file's output.

pub mod assemble;
mod config;
mod error;
pub mod imports;
pub mod literal;
pub mod render;
pub mod scan;
pub mod signature;

use std::path::{Path, PathBuf};

use godoctest_ast::Frontend;
use log::{info, warn};

pub use assemble::{DeclFailure, TestSpec};
pub use config::GenConfig;
pub use error::GenError;

/// Output for one source file that had at least one assembled spec.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub output_path: PathBuf,
    pub package: String,
    pub specs: Vec<TestSpec>,
    pub text: String,
}

/// What happened to one scanned source file.
#[derive(Debug)]
pub struct FileOutcome {
    pub source_path: PathBuf,
    pub package: String,
    pub generated: Option<GeneratedFile>,
    pub decl_failures: Vec<DeclFailure>,
    /// Set when rendering failed; `generated` is then `None`.
    pub render_failure: Option<GenError>,
    /// Import normalization failed; the un-normalized text was kept.
    pub import_warning: Option<GenError>,
}

/// Result of one run over a directory, files in path order.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub files: Vec<FileOutcome>,
}

impl GenerateReport {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter().filter_map(|f| f.generated.as_ref())
    }

    pub fn decl_failures(&self) -> impl Iterator<Item = &DeclFailure> {
        self.files.iter().flat_map(|f| f.decl_failures.iter())
    }

    pub fn render_failures(&self) -> impl Iterator<Item = (&Path, &GenError)> {
        self.files
            .iter()
            .filter_map(|f| f.render_failure.as_ref().map(|e| (f.source_path.as_path(), e)))
    }

    pub fn has_render_failures(&self) -> bool {
        self.render_failures().next().is_some()
    }
}

/// Generate tests for every annotated function in `dir`.
pub fn generate_dir(
    frontend: &dyn Frontend,
    dir: &Path,
    config: &GenConfig,
) -> Result<GenerateReport, GenError> {
    let files = scan::scan_dir(frontend, dir, config)?;
    info!("{}: scanned {} files", dir.display(), files.len());

    let files = files.into_iter().map(|file| generate_file(file, config)).collect();
    Ok(GenerateReport { files })
}

/// Assemble and render one scanned file.
pub fn generate_file(file: scan::ScannedFile, config: &GenConfig) -> FileOutcome {
    let (specs, decl_failures) = assemble::assemble_file(&file, config);
    let mut outcome = FileOutcome {
        source_path: file.path,
        package: file.package,
        generated: None,
        decl_failures,
        render_failure: None,
        import_warning: None,
    };

    if specs.is_empty() {
        info!("{}: nothing to generate", outcome.source_path.display());
        return outcome;
    }

    let source_name = outcome
        .source_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("source.go")
        .to_string();

    let text = match render::render_file(&source_name, &outcome.package, &specs) {
        Ok(text) => text,
        Err(err) => {
            warn!("{}: {}", outcome.source_path.display(), err);
            outcome.render_failure = Some(err);
            return outcome;
        }
    };

    let text = match imports::normalize_imports(&text, &file.imports) {
        Ok(normalized) => normalized,
        Err(err) => {
            warn!("{}: {}", outcome.source_path.display(), err);
            outcome.import_warning = Some(err);
            text
        }
    };

    let output_path = config.output_path(&outcome.source_path);
    info!(
        "{}: {} tests -> {}",
        outcome.source_path.display(),
        specs.len(),
        output_path.display()
    );
    outcome.generated = Some(GeneratedFile {
        output_path,
        package: outcome.package.clone(),
        specs,
        text,
    });
    outcome
}
