// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reporting: colored human output on stderr, or one JSON document.

use std::fs;
use std::path::Path;

use godoctest_ast::{FrontendError, LineMap};
use godoctest_gen::{DeclFailure, FileOutcome, GenError};
use serde::Serialize;

use crate::output;

// =============================================================================
// Human output
// =============================================================================

/// Print an error that stopped a whole directory.
pub fn show_fatal(err: &GenError) {
    match err {
        GenError::ParseFailure(fe) => show_source_error(fe),
        other => eprintln!("{}{}: {}", output::error_label(), output::kind(other.kind()), other),
    }
}

/// Print a parse error with the offending source line.
fn show_source_error(err: &FrontendError) {
    eprintln!();
    eprintln!("{}{}: {}", output::error_label(), output::kind("parse-failure"), err.message);
    eprintln!(
        "  {} {}",
        output::error_arrow(),
        output::file_path(&format!("{}:{}:{}", err.path.display(), err.line, err.column))
    );

    let source = fs::read_to_string(&err.path).unwrap_or_default();
    if let Some(line) = LineMap::new(&source).line_text(&source, err.line) {
        eprintln!("    {}", output::pipe());
        eprintln!("{} {} {}", output::line_number(err.line), output::pipe(), line);
        eprintln!(
            "    {} {}{}",
            output::pipe(),
            " ".repeat(err.column.saturating_sub(1) as usize),
            output::caret()
        );
    }

    if let Some(hint) = &err.hint {
        eprintln!("    {} {}: {}", output::hint_equals(), output::hint_label(), output::hint_text(hint));
    }
}

/// Print skipped declarations and file-level problems of one file.
pub fn show_outcome(file: &FileOutcome, written: bool) {
    for failure in &file.decl_failures {
        show_decl_failure(failure);
    }
    if let Some(err) = &file.render_failure {
        eprintln!(
            "{}{}: {}: {}",
            output::error_label(),
            output::kind(err.kind()),
            output::file_path(&file.source_path.display().to_string()),
            err
        );
    }
    if let Some(err) = &file.import_warning {
        eprintln!(
            "{}{}: {}: {}",
            output::warning_label(),
            output::kind(err.kind()),
            output::file_path(&file.source_path.display().to_string()),
            err
        );
    }
    if let Some(generated) = &file.generated {
        let verb = if written { "wrote" } else { "generated" };
        eprintln!(
            "{} {} {} ({} tests)",
            output::status_pass(),
            verb,
            output::file_path(&generated.output_path.display().to_string()),
            generated.specs.len()
        );
    }
}

fn show_decl_failure(failure: &DeclFailure) {
    eprintln!(
        "{} {}:{}: skipped {}: {} {}",
        output::status_skip(),
        output::file_path(&failure.path.display().to_string()),
        failure.line,
        output::decl_name(&failure.decl),
        failure.error,
        output::kind(failure.error.kind())
    );
}

pub fn show_summary(errors: usize) {
    if errors == 0 {
        eprintln!("{}", output::banner_ok("godoctest"));
    } else {
        eprintln!("{}", output::banner_fail("godoctest", errors));
    }
}

// =============================================================================
// JSON output
// =============================================================================

/// A complete JSON report for one invocation.
#[derive(Debug, Default, Serialize)]
pub struct JsonReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    pub success: bool,
    pub dirs: Vec<DirReport>,
}

/// Everything that happened in one directory.
#[derive(Debug, Serialize)]
pub struct DirReport {
    pub dir: String,
    /// Set when the directory could not be processed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEntry>,
    pub files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_test: Option<TestRun>,
}

impl DirReport {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.display().to_string(), error: None, files: Vec::new(), go_test: None }
    }
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub source: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub written: bool,
    /// Names of the generated test procedures.
    pub tests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<ErrorEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ErrorEntry>,
    /// Generated text, when it was not written to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl FileReport {
    pub fn new(file: &FileOutcome, written: bool) -> Self {
        let generated = file.generated.as_ref();
        Self {
            source: file.source_path.display().to_string(),
            package: file.package.clone(),
            output: generated.map(|g| g.output_path.display().to_string()),
            written: written && generated.is_some(),
            tests: generated
                .map(|g| g.specs.iter().map(|s| s.test_name()).collect())
                .unwrap_or_default(),
            skipped: file.decl_failures.iter().map(ErrorEntry::from_decl).collect(),
            errors: file.render_failure.iter().map(ErrorEntry::from_error).collect(),
            warnings: file.import_warning.iter().map(ErrorEntry::from_error).collect(),
            text: if written { None } else { generated.map(|g| g.text.clone()) },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    /// Stable kebab-case label, e.g. "malformed-literal-block".
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decl: Option<String>,
}

impl ErrorEntry {
    pub fn from_error(err: &GenError) -> Self {
        let (file, line) = match err {
            GenError::ParseFailure(fe) => (Some(fe.path.display().to_string()), Some(fe.line)),
            GenError::Io { path, .. } => (Some(path.display().to_string()), None),
            _ => (None, None),
        };
        Self { kind: err.kind(), message: err.to_string(), file, line, decl: None }
    }

    pub fn from_decl(failure: &DeclFailure) -> Self {
        Self {
            kind: failure.error.kind(),
            message: failure.error.to_string(),
            file: Some(failure.path.display().to_string()),
            line: Some(failure.line),
            decl: Some(failure.decl.clone()),
        }
    }
}

/// Outcome of `go test` in one directory.
#[derive(Debug, Serialize)]
pub struct TestRun {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}
