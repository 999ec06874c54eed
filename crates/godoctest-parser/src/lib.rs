//! Parser for Go source files.
//!
//! Reads the package clause, top-level function signatures and comment
//! groups. Function bodies are skipped.

mod frontend;
mod hints;
mod parser;

pub use frontend::GoFrontend;
pub use parser::{ParseError, ParseResult, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use godoctest_ast::decl::{ChanDir, TypeExpr};
    use godoctest_ast::source::CommentForm;

    fn parse(src: &str) -> ParseResult {
        let lex_result = godoctest_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(lex_result.tokens).parse()
    }

    fn parse_ok(src: &str) -> ParseResult {
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result
    }

    fn param_types(result: &ParseResult, func: usize) -> Vec<String> {
        result.funcs[func].params.iter().map(|p| p.ty.to_string()).collect()
    }

    #[test]
    fn package_and_simple_func() {
        let result = parse_ok("package calc\n\nfunc Add(a int, b int) int {\n\treturn a + b\n}\n");
        assert_eq!(result.package.as_deref(), Some("calc"));
        assert_eq!(result.funcs.len(), 1);
        let add = &result.funcs[0];
        assert_eq!(add.name, "Add");
        assert!(add.has_body);
        assert_eq!(param_types(&result, 0), vec!["int", "int"]);
        assert_eq!(add.params[0].name.as_deref(), Some("a"));
        assert_eq!(add.results.len(), 1);
        assert_eq!(add.results[0].ty, TypeExpr::Named("int".into()));
    }

    #[test]
    fn missing_package_clause() {
        let result = parse("func F() {}\n");
        assert!(!result.is_ok());
        assert!(result.package.is_none());
        assert!(result.errors[0].message.contains("package"));
    }

    #[test]
    fn grouped_names_share_type() {
        let result = parse_ok("package p\nfunc F(a, b int, s string) {}\n");
        let names: Vec<_> = result.funcs[0].params.iter().map(|p| p.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "s"]);
        assert_eq!(param_types(&result, 0), vec!["int", "int", "string"]);
    }

    #[test]
    fn unnamed_params_are_types() {
        let result = parse_ok("package p\nfunc F(int, string) (bool, error)\n");
        assert!(result.funcs[0].params.iter().all(|p| p.name.is_none()));
        assert_eq!(param_types(&result, 0), vec!["int", "string"]);
        assert_eq!(result.funcs[0].results.len(), 2);
        assert!(!result.funcs[0].has_body);
    }

    #[test]
    fn named_results() {
        let result = parse_ok("package p\nfunc Div(a, b float64) (q float64, err error) {\n}\n");
        let results = &result.funcs[0].results;
        assert_eq!(results[0].name.as_deref(), Some("q"));
        assert_eq!(results[1].ty.to_string(), "error");
    }

    #[test]
    fn pointer_slice_map_and_variadic() {
        let result = parse_ok(
            "package p\nfunc F(p *int, xs []string, m map[string][]int, rest ...float64) *bytes.Buffer {}\n",
        );
        assert_eq!(
            param_types(&result, 0),
            vec!["*int", "[]string", "map[string][]int", "...float64"]
        );
        assert!(matches!(result.funcs[0].params[3].ty, TypeExpr::Variadic(_)));
        assert_eq!(
            result.funcs[0].results[0].ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Qualified {
                package: "bytes".into(),
                name: "Buffer".into()
            }))
        );
    }

    #[test]
    fn arrays_channels_and_funcs() {
        let result = parse_ok(
            "package p\nfunc F(a [4]byte, c <-chan int, s chan<- bool, cb func(int) error) {}\n",
        );
        let params = &result.funcs[0].params;
        assert!(matches!(&params[0].ty, TypeExpr::Array { len, .. } if len == "4"));
        assert!(matches!(&params[1].ty, TypeExpr::Chan { dir: ChanDir::Recv, .. }));
        assert!(matches!(&params[2].ty, TypeExpr::Chan { dir: ChanDir::Send, .. }));
        assert!(matches!(&params[3].ty, TypeExpr::Func { results, .. } if results.len() == 1));
    }

    #[test]
    fn generic_param_type_is_not_an_array() {
        let result = parse_ok("package p\nfunc F(List[int], int) {}\nfunc G(a [2]int) {}\n");
        let params = &result.funcs[0].params;
        assert!(params[0].name.is_none());
        assert!(matches!(params[0].ty, TypeExpr::Generic { .. }));
        assert_eq!(param_types(&result, 1), vec!["[2]int"]);
        assert_eq!(result.funcs[1].params[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn methods_and_type_params() {
        let result = parse_ok(
            "package p\nfunc (s *Stack) Push(v int) {}\nfunc Map[K comparable, V any](m map[K]V) []K {}\n",
        );
        assert!(result.funcs[0].is_method());
        assert_eq!(result.funcs[0].name, "Push");
        assert!(result.funcs[1].is_generic());
        assert_eq!(result.funcs[1].type_params.as_deref(), Some("K comparable,V any"));
    }

    #[test]
    fn struct_and_interface_types() {
        let result = parse_ok("package p\nfunc F(v interface{}, s struct{ x int }) {}\n");
        assert_eq!(param_types(&result, 0), vec!["interface{}", "struct{x int}"]);
    }

    #[test]
    fn skips_other_declarations() {
        let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nvar x = map[string]int{\"a\": 1}\n\ntype T struct {\n\tA int\n}\n\nconst (\n\tA = iota\n\tB\n)\n\nfunc F() {}\n";
        let result = parse_ok(src);
        assert_eq!(result.funcs.len(), 1);
        assert_eq!(result.funcs[0].name, "F");
        let paths: Vec<_> = result.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["fmt", "os"]);
    }

    #[test]
    fn import_specs() {
        let src = "package p

import \"strings\"
import e \"example.com/m/errs\"

import (
	// grouped
	_ \"embed\"
	. \"math\"; `net/url`
)

func F() {}
";
        let result = parse_ok(src);
        let specs: Vec<_> = result
            .imports
            .iter()
            .map(|i| (i.alias.as_deref(), i.path.as_str(), i.name()))
            .collect();
        assert_eq!(
            specs,
            vec![
                (None, "strings", "strings"),
                (Some("e"), "example.com/m/errs", "e"),
                (Some("_"), "embed", "_"),
                (Some("."), "math", "."),
                (None, "net/url", "url"),
            ]
        );
        assert_eq!(result.funcs.len(), 1);
    }

    #[test]
    fn unquoted_import_path_is_an_error() {
        let result = parse("package p
import fmt
func F() {}
");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("import path"), "got {}", result.errors[0].message);
        assert_eq!(result.funcs.len(), 1);
    }

    #[test]
    fn multiline_params() {
        let result = parse_ok("package p\nfunc F(\n\ta int,\n\tb string,\n) bool {\n\treturn true\n}\n");
        assert_eq!(param_types(&result, 0), vec!["int", "string"]);
        assert_eq!(result.funcs[0].results.len(), 1);
    }

    #[test]
    fn signature_span_ends_at_result() {
        let src = "package p\nfunc F(a int) int {\n}\n";
        let result = parse_ok(src);
        let sig = result.funcs[0].signature;
        assert_eq!(&src[sig.start..sig.end], "func F(a int) int");
    }

    #[test]
    fn unbalanced_body_is_an_error() {
        let result = parse("package p\nfunc F() {\n\tif true {\n}\n");
        assert!(!result.is_ok());
        assert!(result.errors[0].message.contains("Unclosed"));
    }

    #[test]
    fn stray_closer_is_an_error() {
        let result = parse("package p\nfunc F() {\n\tx := (1]\n}\n");
        assert!(!result.is_ok());
    }

    #[test]
    fn missing_param_type() {
        let result = parse("package p\nfunc F(a, b int, c) {}\n");
        assert!(!result.is_ok());
    }

    #[test]
    fn comment_groups() {
        let src = "package p\n\n// one\n// two\n\n// three\nfunc F() {\n\t/* block\n\t   more */\n}\n";
        let result = parse_ok(src);
        assert_eq!(result.comments.len(), 3);
        assert_eq!(result.comments[0].text, "// one\n// two");
        assert_eq!(result.comments[0].form, CommentForm::Line);
        assert_eq!(result.comments[1].text, "// three");
        assert_eq!(result.comments[2].form, CommentForm::Block);
    }

    #[test]
    fn code_breaks_comment_group() {
        let src = "package p\nfunc F() {\n\t// a\n\tx := 1 // b\n\t// c\n}\n";
        let result = parse_ok(src);
        let texts: Vec<_> = result.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// a", "// b\n// c"]);
    }

    #[test]
    fn error_recovery_continues_to_next_func() {
        let result = parse("package p\n) junk\nfunc G() {}\n");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.funcs.len(), 1);
        assert_eq!(result.funcs[0].name, "G");
    }
}
