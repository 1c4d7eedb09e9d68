mod cli;
mod directive;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use fxhash::FxHashSet;
use glob::glob;
use snakecheck::diag::{DiagCtx, Diagnostic, IntoDiagnostic, print_to_stderr};
use snakecheck::location::Position;
use snakecheck::parse::analyze;
use snakecheck::sourcemap::SourceFile;
use snakecheck::util::format_iter;
use yansi::Paint;

use self::cli::Args;
use self::directive::{Directive, parse_directives};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestResult {
    Passed,
    Failed,
}

#[derive(Default)]
struct TestDiagCtx {
    diags: Vec<Diagnostic>,
}

impl DiagCtx for TestDiagCtx {
    fn emit(&mut self, diag: impl IntoDiagnostic) {
        self.diags.push(diag.into_diagnostic());
    }
}

/// What one analysis produced, as seen by the directives.
struct TestRunData {
    diags: Vec<Diagnostic>,
    output: String,
    pos: Option<Position>,
    failed: bool,
}

/// A program paired with the directives of its `.expect` file.
struct Test {
    file: SourceFile,
    directives: Vec<Directive>,
}

impl Test {
    fn load(path: &Path) -> Result<Self, String> {
        let expect_path = path.with_extension("expect");
        let file = SourceFile::load(path)
            .map_err(|e| format!("could not read `{}`: {e}", path.display()))?;
        let expectations = fs::read_to_string(&expect_path)
            .map_err(|e| format!("could not read `{}`: {e}", expect_path.display()))?;
        let directives = parse_directives(&expectations).map_err(|e| {
            format!("could not parse directives in `{}`: {e}", expect_path.display())
        })?;

        Ok(Self { file, directives })
    }

    fn name(&self) -> &str {
        self.file.name()
    }

    fn analyze(&self) -> TestRunData {
        let outcome = analyze(self.file.contents());
        let mut diag = TestDiagCtx::default();
        let output = outcome.to_string();
        let pos = outcome.error().map(|e| e.pos());
        let failed = !outcome.is_success();

        if let Some(e) = outcome.into_error() {
            diag.emit(e);
        }

        TestRunData {
            diags: diag.diags,
            output,
            pos,
            failed,
        }
    }

    fn run(&self, args: &Args) -> TestResult {
        let run_data = self.analyze();
        let mut result = TestResult::Passed;

        for directive in &self.directives {
            if directive.check(&run_data) == TestResult::Failed {
                result = TestResult::Failed;

                if args.first_failure {
                    break;
                }
            }
        }

        if result == TestResult::Failed || args.all_diagnostics {
            for diag in &run_data.diags {
                print_to_stderr(diag, &self.file, &Default::default());
            }
        }

        result
    }
}

fn load_tests(pattern: &str) -> Result<Vec<Test>, String> {
    let entries = glob(pattern).map_err(|e| format!("invalid pattern `{pattern}`: {e}"))?;
    let tests = entries
        .map(|entry| Test::load(&entry.map_err(|e| e.to_string())?))
        .collect::<Result<Vec<_>, _>>()?;

    if tests.is_empty() {
        return Err(format!("no programs match `{pattern}`"));
    }

    Ok(tests)
}

/// Keeps only the named programs, if any were named.
fn select(tests: Vec<Test>, names: Option<&[String]>) -> Result<Vec<Test>, String> {
    let Some(names) = names else {
        return Ok(tests);
    };

    let mut unknown = names.iter().map(String::as_str).collect::<FxHashSet<_>>();
    let tests = tests
        .into_iter()
        .filter(|test| unknown.remove(test.name()))
        .collect::<Vec<_>>();

    if !unknown.is_empty() {
        return Err(format!(
            "unknown programs: {}",
            format_iter(unknown.iter().map(|name| format!("`{name}`")), "and", ""),
        ));
    }

    Ok(tests)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let loaded = load_tests(&args.programs).and_then(|tests| select(tests, args.tests.as_deref()));

    let tests = match loaded {
        Ok(tests) => tests,

        Err(e) => {
            eprintln!("{}: {e}", "Error".bright_red().bold());

            return ExitCode::from(2);
        }
    };

    let mut failed = vec![];

    for test in &tests {
        eprintln!("{} `{}`...", "Checking".bright_cyan().bold(), test.name());

        if test.run(&args) == TestResult::Failed {
            eprintln!("{}", format_args!("Program `{}` failed!", test.name()).bright_red());
            failed.push(test.name());
        }
    }

    eprintln!();
    eprintln!(
        "{} of {} programs behaved as expected",
        (tests.len() - failed.len()).bright_green(),
        tests.len(),
    );

    if failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        eprintln!("Failed: {}", format_iter(failed.iter().map(|name| name.red()), "and", ""));

        ExitCode::FAILURE
    }
}
