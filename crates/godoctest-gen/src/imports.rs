// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Import normalization for generated files.
//!
//! The renderer always emits the same import block. Table values may refer
//! to other packages (`errors.New`, `time.Second`, or a package the source
//! file imports), and a package nothing refers to would not compile, so the
//! block is rebuilt from the qualified identifiers the file actually uses.

use std::collections::{BTreeMap, BTreeSet};

use godoctest_ast::decl::ImportSpec;
use godoctest_ast::token::TokenKind;
use godoctest_lexer::Lexer;

use crate::GenError;

/// Standard packages that can be added on demand, by package name.
const STD_PACKAGES: &[(&str, &str)] = &[
    ("base64", "encoding/base64"),
    ("big", "math/big"),
    ("bytes", "bytes"),
    ("context", "context"),
    ("errors", "errors"),
    ("filepath", "path/filepath"),
    ("fmt", "fmt"),
    ("hex", "encoding/hex"),
    ("io", "io"),
    ("json", "encoding/json"),
    ("math", "math"),
    ("os", "os"),
    ("path", "path"),
    ("reflect", "reflect"),
    ("regexp", "regexp"),
    ("sort", "sort"),
    ("strconv", "strconv"),
    ("strings", "strings"),
    ("testing", "testing"),
    ("time", "time"),
    ("unicode", "unicode"),
    ("url", "net/url"),
    ("utf8", "unicode/utf8"),
];

const IMPORT_OPEN: &str = "\nimport (\n";
const IMPORT_CLOSE: &str = "\n)\n";

/// Rebuild the import block of generated Go source.
///
/// A referenced name resolves to the first match among the renderer's
/// fixed imports, the source file's `imports`, and the standard packages
/// known by name. Names that resolve to nothing are left for the compiler
/// to report.
pub fn normalize_imports(text: &str, imports: &[ImportSpec]) -> Result<String, GenError> {
    let Some(open) = text.find(IMPORT_OPEN) else {
        return Err(GenError::ImportNormalizeFailure("no import block".to_string()));
    };
    let block_start = open + 1;
    let inner_start = open + IMPORT_OPEN.len();
    let Some(close) = text[inner_start..].find(IMPORT_CLOSE) else {
        return Err(GenError::ImportNormalizeFailure("import block is not closed".to_string()));
    };
    let inner_end = inner_start + close;
    let rest = &text[inner_end + IMPORT_CLOSE.len()..];

    let used = referenced_packages(rest)?;

    // name -> (alias, path)
    let mut resolved: BTreeMap<&str, (Option<&str>, &str)> = BTreeMap::new();
    for path in text[inner_start..inner_end].lines().map(|line| line.trim().trim_matches('"')) {
        let name = package_name(path);
        if !path.is_empty() && used.contains(name) {
            resolved.entry(name).or_insert((None, path));
        }
    }
    for spec in imports.iter().filter(|spec| spec.is_named_reference()) {
        let name = spec.name();
        if used.contains(name) {
            resolved.entry(name).or_insert((spec.alias.as_deref(), spec.path.as_str()));
        }
    }
    for &(name, path) in STD_PACKAGES {
        if used.contains(name) {
            resolved.entry(name).or_insert((None, path));
        }
    }

    let mut specs: Vec<_> = resolved.into_values().collect();
    specs.sort_by(|a, b| a.1.cmp(b.1));

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..block_start]);
    if !specs.is_empty() {
        out.push_str("import (\n");
        for (alias, path) in specs {
            match alias {
                Some(alias) => out.push_str(&format!("\t{} \"{}\"\n", alias, path)),
                None => out.push_str(&format!("\t\"{}\"\n", path)),
            }
        }
        out.push_str(")\n");
    }
    out.push_str(rest);
    Ok(out)
}

/// Last element of an import path, which is the package name for every
/// standard package.
fn package_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Identifiers used as `name.Member` where `name` is not itself a member.
fn referenced_packages(code: &str) -> Result<BTreeSet<String>, GenError> {
    let lexed = Lexer::new(code).tokenize();
    if let Some(err) = lexed.errors.first() {
        return Err(GenError::ImportNormalizeFailure(format!(
            "generated code does not lex: {}",
            err.message
        )));
    }

    let kinds: Vec<&TokenKind> = lexed
        .tokens
        .iter()
        .map(|t| &t.kind)
        .filter(|k| !k.is_trivia())
        .collect();

    let mut used = BTreeSet::new();
    for (i, pair) in kinds.windows(2).enumerate() {
        if let (TokenKind::Ident(name), TokenKind::Dot) = (pair[0], pair[1]) {
            let after_dot = i > 0 && *kinds[i - 1] == TokenKind::Dot;
            if !after_dot {
                used.insert(name.clone());
            }
        }
    }
    Ok(used)
}
