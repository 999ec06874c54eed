// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! End-to-end generation over the Go fixture packages in `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};

use godoctest_gen::{generate_dir, FileOutcome, GenConfig, GenError, GenerateReport};
use godoctest_parser::GoFrontend;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn generate(dir: &Path) -> GenerateReport {
    generate_dir(&GoFrontend, dir, &GenConfig::default()).expect("generation failed")
}

fn outcome<'a>(report: &'a GenerateReport, file: &str) -> &'a FileOutcome {
    report
        .files
        .iter()
        .find(|f| f.source_path.file_name().unwrap() == file)
        .unwrap_or_else(|| panic!("no outcome for {}", file))
}

fn text<'a>(report: &'a GenerateReport, file: &str) -> &'a str {
    &outcome(report, file).generated.as_ref().expect("nothing generated").text
}

#[test]
fn files_are_scanned_in_path_order() {
    let report = generate(&fixture("testpkg"));
    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.source_path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    // existing_test.go is a test file and is never scanned.
    assert_eq!(names, vec!["fib.go", "ptrargs.go", "strings.go"]);
    assert!(report.files.iter().all(|f| f.package == "testpkg"));
}

#[test]
fn fibonacci_table() {
    let report = generate(&fixture("testpkg"));
    let fib = outcome(&report, "fib.go");
    let generated = fib.generated.as_ref().unwrap();

    assert_eq!(generated.output_path, fixture("testpkg").join("fib_gdt_test.go"));
    assert_eq!(generated.specs.len(), 1);
    assert_eq!(generated.specs[0].rows.len(), 5);

    let text = &generated.text;
    assert!(text.starts_with("// Code generated by godoctest from fib.go. DO NOT EDIT.\n"));
    assert!(text.contains("package testpkg\n"));
    assert!(text.contains("func Test_fibonacci_gdt1(t *testing.T) {"));
    assert!(text.contains("\t\t{1, 1},\n\t\t{2, 1},\n\t\t{3, 2},\n\t\t{7, 13},\n\t\t{11, 89},\n"));
    assert!(text.contains("r0 := fibonacci(test.f0)"));
    assert!(text.contains("if !gdtObjectsAreEqual_fib(test.e0, r0) {"));
}

#[test]
fn pointer_fields_use_storage_table() {
    let report = generate(&fixture("testpkg"));
    let text = text(&report, "ptrargs.go");

    assert!(text.contains("func Test_ptrargs_gdt1(t *testing.T) {"));
    assert!(text.contains("\tptrData := []struct {\n\t\tf0 string\n\t\tf2 int\n\t}{\n\t\t{f2: 13},\n\t\t{f0: \"\"},\n\t}\n"));
    assert!(text.contains("\t\t{nil, \"\", &ptrData[0].f2, 42.0, errNoString},\n"));
    assert!(text.contains("\t\t{&ptrData[1].f0, \"x\", nil, 42.0, nil},\n"));
    assert!(text.contains("r0 := ptrargs(test.f0, test.f1, test.f2, test.f3)"));
}

#[test]
fn bad_declarations_are_skipped_not_fatal() {
    let report = generate(&fixture("testpkg"));
    let ptr = outcome(&report, "ptrargs.go");

    let failures: Vec<_> = ptr
        .decl_failures
        .iter()
        .map(|f| (f.decl.as_str(), f.error.kind()))
        .collect();
    assert_eq!(
        failures,
        vec![("keys", "unsupported-type-shape"), ("half", "malformed-literal-block")]
    );
    assert!(ptr.generated.is_some());
    assert!(ptr.render_failure.is_none());
    assert!(!report.has_render_failures());
    assert_eq!(report.decl_failures().count(), 2);
}

#[test]
fn line_block_variadic_and_multiline_signatures() {
    let report = generate(&fixture("testpkg"));
    let text = text(&report, "strings.go");

    assert!(text.contains("func Test_Upper_gdt1(t *testing.T) {"));
    assert!(text.contains("\t\t{\"foo\", \"FOO\"},\n"));

    assert!(text.contains("func Test_Join_gdt2(t *testing.T) {"));
    assert!(text.contains("\t\tf0 []string\n"));
    assert!(text.contains("\t\t{[]string{\"a\", \"b\"}, \"ab\"},\n"));
    assert!(text.contains("r0 := Join(test.f0...)"));

    assert!(text.contains("func Test_Describe_gdt3(t *testing.T) {"));
    assert!(text.contains("r0, r1 := Describe(test.f0, test.f1, test.f2)"));
    assert!(!text.contains("untouched"));
}

#[test]
fn output_is_reproducible() {
    let first = generate(&fixture("testpkg"));
    let second = generate(&fixture("testpkg"));
    let texts = |r: &GenerateReport| r.generated().map(|g| g.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(&first), texts(&second));
}

#[test]
fn parse_failure_aborts_the_run() {
    let err = generate_dir(&GoFrontend, &fixture("broken"), &GenConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "parse-failure");
    assert!(matches!(err, GenError::ParseFailure(ref e) if e.path.ends_with("broken.go")));
}

#[test]
fn missing_directory_is_an_io_error() {
    let err = generate_dir(&GoFrontend, &fixture("does-not-exist"), &GenConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "io");
}

#[test]
fn generated_files_are_not_rescanned() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture("testpkg/fib.go"), dir.path().join("fib.go")).unwrap();
    fs::write(dir.path().join("notes.txt"), "not go").unwrap();

    let report = generate(dir.path());
    let generated = report.generated().next().unwrap();
    fs::write(&generated.output_path, &generated.text).unwrap();

    let again = generate(dir.path());
    assert_eq!(again.files.len(), 1);
    assert_eq!(again.generated().next().unwrap().text, generated.text);
}

#[test]
fn custom_sentinel_and_null_token() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("deref.go"),
        "package deref\n\nfunc deref(p *int) int {\n\t// @example = {\n\t//     {NULL, 0},\n\t//     {5, 5},\n\t// }\n\tif p == nil {\n\t\treturn 0\n\t}\n\treturn *p\n}\n",
    )
    .unwrap();

    let config = GenConfig {
        sentinel: "@example".into(),
        null_token: "NULL".into(),
        ..GenConfig::default()
    };
    let report = generate_dir(&GoFrontend, dir.path(), &config).unwrap();
    let text = &report.generated().next().unwrap().text;
    assert!(text.contains("\t\t{nil, 0},\n\t\t{&ptrData[1].f0, 5},\n"));
    assert!(text.contains("\t\t{},\n\t\t{f0: 5},\n"));

    let default = generate(dir.path());
    assert!(default.generated().next().is_none());
}

#[test]
fn values_referencing_std_packages_get_imports() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("wrap.go"),
        "package wrap\n\nimport \"fmt\"\n\nfunc wrap(msg string) error {\n\t// @test = {{\"x\", fmt.Errorf(\"x\")}}\n\treturn fmt.Errorf(msg)\n}\n",
    )
    .unwrap();

    let report = generate(dir.path());
    let file = &report.files[0];
    assert!(file.import_warning.is_none());
    let text = &file.generated.as_ref().unwrap().text;
    assert!(text.contains("import (\n\t\"bytes\"\n\t\"fmt\"\n\t\"reflect\"\n\t\"testing\"\n)\n"));
}

#[test]
fn unicode_identifiers_do_not_abort_the_package() {
    let report = generate(&fixture("deps"));
    let text = text(&report, "consts.go");
    assert!(text.contains("func Test_Área_gdt1(t *testing.T) {"));
    assert!(text.contains("r0 := Área(test.f0)"));
    assert!(outcome(&report, "check.go").generated.is_some());
}

#[test]
fn values_referencing_source_imports_get_imports() {
    let report = generate(&fixture("deps"));
    let check = outcome(&report, "check.go");
    assert!(check.import_warning.is_none());

    let text = &check.generated.as_ref().unwrap().text;
    assert!(text.contains("\t\t{0, errs.ErrZero},\n"));
    assert!(
        text.contains(
            "import (\n\t\"bytes\"\n\t\"example.com/m/errs\"\n\tkv \"example.com/m/store/v2\"\n\t\"reflect\"\n\t\"testing\"\n)\n"
        ),
        "got:\n{}",
        text
    );
    assert!(!text.contains("strconv"));
}

#[test]
fn init_is_skipped() {
    let report = generate(&fixture("deps"));
    let check = outcome(&report, "check.go");

    let failures: Vec<_> = check
        .decl_failures
        .iter()
        .map(|f| (f.decl.as_str(), f.error.kind()))
        .collect();
    assert_eq!(failures, vec![("init", "unsupported-type-shape")]);

    let text = &check.generated.as_ref().unwrap().text;
    assert!(text.contains("func Test_check_gdt1(t *testing.T) {"));
    assert!(text.contains("func Test_open_gdt2(t *testing.T) {"));
    assert!(!text.contains("init()"));
}
