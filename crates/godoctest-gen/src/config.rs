// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Generator settings.

use std::path::{Path, PathBuf};

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Marker that identifies a comment block as a test table.
    pub sentinel: String,
    /// Token that stands for an absent pointer value in a table.
    pub null_token: String,
    /// Appended to a source file's stem to name its generated file.
    pub output_suffix: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            sentinel: "@test".to_string(),
            null_token: "nil".to_string(),
            output_suffix: "_gdt_test.go".to_string(),
        }
    }
}

impl GenConfig {
    /// Where the generated file for `source` goes: same directory, stem plus
    /// the output suffix.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("source");
        source.with_file_name(format!("{}{}", stem, self.output_suffix))
    }
}
