//! godoctest - generate table-driven Go tests from `@test` doc-comment tables.

mod output;
mod report;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use godoctest_gen::{generate_dir, GenConfig};
use godoctest_parser::GoFrontend;

use report::{DirReport, ErrorEntry, FileReport, JsonReport, TestRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Colored messages on stderr, generated code on stdout
    Human,
    /// One JSON report on stdout
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "godoctest")]
#[command(about = "Generate table-driven Go tests from @test doc-comment tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Go package directories to scan
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    /// Run 'go test' after generating
    #[arg(short = 't', long = "test")]
    run_tests: bool,

    /// Write generated files instead of printing them
    #[arg(short, long)]
    write: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    format: Format,

    /// Marker that starts a test table in a comment
    #[arg(long, env = "GODOCTEST_SENTINEL", default_value = "@test")]
    sentinel: String,

    /// Token that stands for a nil pointer in a table
    #[arg(long = "null", env = "GODOCTEST_NULL", default_value = "nil")]
    null_token: String,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> GenConfig {
        GenConfig {
            sentinel: self.sentinel.clone(),
            null_token: self.null_token.clone(),
            ..GenConfig::default()
        }
    }

    fn human(&self) -> bool {
        self.format == Format::Human
    }
}

fn main() {
    let cli = Cli::parse();
    output::init();
    init_logging(cli.verbose);
    process::exit(run(&cli));
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Process every directory; returns the exit code.
fn run(cli: &Cli) -> i32 {
    let config = cli.config();
    let mut errors = 0;
    let mut json = JsonReport { version: 1, ..JsonReport::default() };

    for dir in &cli.dirs {
        let mut entry = DirReport::new(dir);

        let report = match generate_dir(&GoFrontend, dir, &config) {
            Ok(report) => report,
            Err(err) => {
                errors += 1;
                if cli.human() {
                    report::show_fatal(&err);
                }
                entry.error = Some(ErrorEntry::from_error(&err));
                json.dirs.push(entry);
                continue;
            }
        };

        let mut write_failure = None;
        for generated in report.generated() {
            if cli.write {
                if let Err(err) = runner::write_generated(generated) {
                    write_failure = Some(err);
                    break;
                }
            } else if cli.human() {
                print!("{}", generated.text);
            }
        }

        // A failed write stops the run.
        if let Some(err) = write_failure {
            errors += 1;
            if cli.human() {
                report::show_fatal(&err);
            }
            entry.error = Some(ErrorEntry::from_error(&err));
            json.dirs.push(entry);
            break;
        }

        for file in &report.files {
            if file.render_failure.is_some() {
                errors += 1;
            }
            if cli.human() {
                report::show_outcome(file, cli.write);
            }
            entry.files.push(FileReport::new(file, cli.write));
        }

        if cli.run_tests {
            match runner::go_test(dir, !cli.human()) {
                Ok((passed, log)) => {
                    if !passed {
                        errors += 1;
                    }
                    entry.go_test = Some(TestRun { passed, output: log });
                }
                Err(err) => {
                    errors += 1;
                    if cli.human() {
                        eprintln!("{}: cannot run go test in {}: {}", output::error_label(), dir.display(), err);
                    }
                    entry.go_test = Some(TestRun { passed: false, output: Some(err.to_string()) });
                }
            }
        }

        json.dirs.push(entry);
    }

    if cli.human() {
        report::show_summary(errors);
    } else {
        json.success = errors == 0;
        match serde_json::to_string_pretty(&json) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("{}: cannot serialize report: {}", output::error_label(), err);
                return 1;
            }
        }
    }

    if errors == 0 {
        0
    } else {
        1
    }
}
