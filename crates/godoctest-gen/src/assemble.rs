// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Test case assembly: one `TestSpec` per annotated declaration.

use std::path::PathBuf;

use log::{debug, warn};

use crate::literal::{self, PointerEntry};
use crate::scan::{AnnotationBlock, ScannedDecl, ScannedFile};
use crate::signature::{self, Signature};
use crate::{GenConfig, GenError};

/// Everything the renderer needs for one generated test procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSpec {
    pub func_name: String,
    /// 1-based position among the annotated declarations of the file.
    pub suffix: usize,
    /// First line of the signature.
    pub line: u32,
    pub signature: Signature,
    pub rows: Vec<Vec<String>>,
    pub pointer_rows: Vec<Vec<PointerEntry>>,
}

impl TestSpec {
    pub fn test_name(&self) -> String {
        format!("Test_{}_gdt{}", self.func_name, self.suffix)
    }

    pub fn has_pointer_storage(&self) -> bool {
        self.pointer_rows.iter().any(|row| !row.is_empty())
    }
}

/// An annotated declaration that was skipped.
#[derive(Debug)]
pub struct DeclFailure {
    pub path: PathBuf,
    pub decl: String,
    pub line: u32,
    pub error: GenError,
}

/// Assemble every annotated declaration of a file.
///
/// Failures are collected per declaration; the others still assemble.
pub fn assemble_file(file: &ScannedFile, config: &GenConfig) -> (Vec<TestSpec>, Vec<DeclFailure>) {
    let mut specs = Vec::new();
    let mut failures = Vec::new();

    for (ordinal, (decl, block)) in file.annotated().enumerate() {
        match assemble_decl(decl, block, ordinal + 1, config) {
            Ok(spec) => {
                debug!(
                    "{}: `{}` -> {} with {} cases",
                    file.path.display(),
                    spec.func_name,
                    spec.test_name(),
                    spec.rows.len()
                );
                specs.push(spec);
            }
            Err(error) => {
                warn!(
                    "{}:{}: skipping `{}`: {}",
                    file.path.display(),
                    decl.lines.start,
                    decl.func.name,
                    error
                );
                failures.push(DeclFailure {
                    path: file.path.clone(),
                    decl: decl.func.name.clone(),
                    line: decl.lines.start,
                    error,
                });
            }
        }
    }

    (specs, failures)
}

/// Build one `TestSpec` from a declaration and its annotation block.
pub fn assemble_decl(
    decl: &ScannedDecl,
    block: &AnnotationBlock,
    suffix: usize,
    config: &GenConfig,
) -> Result<TestSpec, GenError> {
    let signature = signature::extract(&decl.func)?;

    let text = literal::strip_comment_markers(&block.text, block.form);
    let body = literal::table_body(&text, &config.sentinel)?;
    let table = literal::tokenize(body, &signature, &config.null_token)?;

    Ok(TestSpec {
        func_name: decl.func.name.clone(),
        suffix,
        line: decl.lines.start,
        signature,
        rows: table.rows,
        pointer_rows: table.pointer_rows,
    })
}
