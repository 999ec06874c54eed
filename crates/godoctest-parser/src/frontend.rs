// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The Go front end: lexer and parser behind the `Frontend` seam.

use std::path::Path;

use godoctest_ast::source::SourceUnit;
use godoctest_ast::{Frontend, FrontendError, LineMap, Span};
use godoctest_lexer::Lexer;

use crate::Parser;

/// Parses `.go` files. Existing `_test.go` files are never scanned.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoFrontend;

impl Frontend for GoFrontend {
    fn accepts(&self, path: &Path) -> bool {
        let is_go = path.extension().map_or(false, |ext| ext == "go");
        let is_test = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.ends_with("_test.go"));
        is_go && !is_test
    }

    fn parse_file(&self, path: &Path, source: &str) -> Result<SourceUnit, FrontendError> {
        let line_map = LineMap::new(source);

        let lex_result = Lexer::new(source).tokenize();
        if let Some(first) = lex_result.errors.first() {
            return Err(to_frontend_error(
                path,
                &line_map,
                first.span,
                &first.message,
                first.hint.clone(),
                lex_result.errors.len(),
            ));
        }

        let result = Parser::new(lex_result.tokens).parse();
        if let Some(first) = result.errors.first() {
            return Err(to_frontend_error(
                path,
                &line_map,
                first.span,
                &first.message,
                first.hint.clone(),
                result.errors.len(),
            ));
        }

        let Some(package) = result.package else {
            return Err(FrontendError {
                path: path.to_path_buf(),
                line: 1,
                column: 1,
                message: "missing package clause".to_string(),
                hint: None,
            });
        };

        Ok(SourceUnit {
            path: path.to_path_buf(),
            package,
            imports: result.imports,
            funcs: result.funcs,
            comments: result.comments,
            line_map,
        })
    }
}

fn to_frontend_error(
    path: &Path,
    line_map: &LineMap,
    span: Span,
    message: &str,
    hint: Option<String>,
    total: usize,
) -> FrontendError {
    let (line, column) = line_map.offset_to_line_col(span.start);
    let message = if total > 1 {
        format!("{} (and {} more)", message, total - 1)
    } else {
        message.to_string()
    };
    FrontendError { path: path.to_path_buf(), line, column, message, hint }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_go_sources_only() {
        let fe = GoFrontend;
        assert!(fe.accepts(Path::new("pkg/calc.go")));
        assert!(!fe.accepts(Path::new("pkg/calc_test.go")));
        assert!(!fe.accepts(Path::new("pkg/calc_gdt_test.go")));
        assert!(!fe.accepts(Path::new("pkg/README.md")));
        assert!(!fe.accepts(Path::new("pkg/go")));
    }

    #[test]
    fn parses_unit_with_line_map() {
        let src = "package calc\n\nfunc Add(a, b int) int {\n\t// @test = {{1, 2, 3}}\n\treturn a + b\n}\n";
        let unit = GoFrontend.parse_file(Path::new("calc.go"), src).unwrap();
        assert_eq!(unit.package, "calc");
        assert_eq!(unit.funcs.len(), 1);
        assert_eq!(unit.comments.len(), 1);
        assert_eq!(unit.lines(unit.funcs[0].signature).end, 3);
        assert_eq!(unit.lines(unit.comments[0].span).start, 4);
    }

    #[test]
    fn reports_position_of_first_error() {
        let src = "package calc\n\nfunc Add(a, b int int {\n}\n";
        let err = GoFrontend.parse_file(Path::new("calc.go"), src).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.to_string().starts_with("calc.go:3:"));
    }

    #[test]
    fn lex_errors_are_reported() {
        let src = "package calc\n\nvar s = \"open\n";
        let err = GoFrontend.parse_file(Path::new("calc.go"), src).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("Unterminated"));
    }
}
