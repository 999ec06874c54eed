// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The seam between a host-language parser and the generator.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::source::SourceUnit;

/// A parser for one host language.
///
/// The generator reads files and hands their text to a front end; it never
/// inspects a concrete syntax tree.
pub trait Frontend {
    /// Whether `path` is a source file this front end should scan.
    fn accepts(&self, path: &Path) -> bool;

    /// Parse one file's text.
    fn parse_file(&self, path: &Path, source: &str) -> Result<SourceUnit, FrontendError>;
}

/// A source file could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendError {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.path.display(), self.line, self.column, self.message)
    }
}

impl std::error::Error for FrontendError {}
