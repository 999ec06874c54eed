// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Generator errors.

use std::path::PathBuf;

use godoctest_ast::FrontendError;
use thiserror::Error;

/// Everything that can go wrong between reading a directory and emitting
/// generated test text.
#[derive(Debug, Error)]
pub enum GenError {
    /// A source file could not be parsed. Aborts the whole run.
    #[error("{0}")]
    ParseFailure(#[from] FrontendError),

    /// A parameter or result is not `T`, `*T` or `...T`, or the declaration
    /// cannot be called as a plain function.
    #[error("unsupported type `{ty}` for {slot}")]
    UnsupportedTypeShape { slot: String, ty: String },

    /// The literal table is unbalanced or a row has the wrong field count.
    #[error("malformed literal block: {0}")]
    MalformedLiteralBlock(String),

    /// The assembled tests could not be rendered. Fatal for one file.
    #[error("cannot render tests: {0}")]
    RenderFailure(String),

    /// Generated text has no import block to adjust.
    #[error("cannot normalize imports: {0}")]
    ImportNormalizeFailure(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Stable label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            GenError::ParseFailure(_) => "parse-failure",
            GenError::UnsupportedTypeShape { .. } => "unsupported-type-shape",
            GenError::MalformedLiteralBlock(_) => "malformed-literal-block",
            GenError::RenderFailure(_) => "render-failure",
            GenError::ImportNormalizeFailure(_) => "import-normalize-failure",
            GenError::Io { .. } => "io",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io { path: path.into(), source }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GenError::MalformedLiteralBlock(message.into())
    }
}

impl From<minijinja::Error> for GenError {
    fn from(err: minijinja::Error) -> Self {
        GenError::RenderFailure(err.to_string())
    }
}
