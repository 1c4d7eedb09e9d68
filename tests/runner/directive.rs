use std::sync::LazyLock;

use derive_more::From;
use regex::{Regex, RegexSet};
use snakecheck::diag::Level;
use snakecheck::location::Position;

use crate::{TestResult, TestRunData};

#[derive(From)]
pub enum Directive {
    Diag(DirectiveDiag),
    Pass(DirectivePass),
    Output(DirectiveOutput),
}

impl Directive {
    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        match self {
            Self::Diag(d) => d.check(run_data),
            Self::Pass(d) => d.check(run_data),
            Self::Output(d) => d.check(run_data),
        }
    }
}

pub struct DirectiveDiag {
    line: usize,
    code: String,
    pos: Option<Position>,
}

static DIRECTIVE_DIAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^ERROR\((?<code>[[:word:]]+::[[:word:]]+)\)(?: at (?<line>\d+):(?<column>\d+))?$"#,
    )
    .unwrap()
});

impl DirectiveDiag {
    fn parse(directive: &str, line: usize) -> Self {
        let captures = DIRECTIVE_DIAG_REGEX.captures(directive).unwrap();
        let code = captures["code"].to_owned();
        let pos = captures.name("line").zip(captures.name("column")).map(|(l, c)| {
            Position::new(l.as_str().parse().unwrap(), c.as_str().parse().unwrap())
        });

        Self { line, code, pos }
    }

    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        let diag_found = run_data
            .diags
            .iter()
            .any(|diag| diag.level == Level::Error && diag.code.code() == self.code);

        if !diag_found {
            eprintln!(
                "Could not find an {} `{}` matching the directive at line {}",
                Level::Error,
                self.code,
                self.line,
            );

            return TestResult::Failed;
        }

        match self.pos {
            Some(pos) if run_data.pos != Some(pos) => {
                eprintln!(
                    "The error was reported at {}, but the directive at line {} expects {pos}",
                    run_data.pos.map(|pos| pos.to_string()).unwrap_or_default(),
                    self.line,
                );

                TestResult::Failed
            }

            _ => TestResult::Passed,
        }
    }
}

pub struct DirectivePass;

static DIRECTIVE_PASS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^PASS$"#).unwrap());

impl DirectivePass {
    pub fn parse(_directive: &str) -> Self {
        Self
    }

    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        if run_data.failed {
            eprintln!("The file failed unexpectedly!");

            TestResult::Failed
        } else {
            TestResult::Passed
        }
    }
}

pub struct DirectiveOutput {
    line: usize,
    text: String,
}

static DIRECTIVE_OUTPUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^OUTPUT (?<text>.+)$"#).unwrap());

impl DirectiveOutput {
    pub fn parse(directive: &str, line: usize) -> Self {
        let captures = DIRECTIVE_OUTPUT_REGEX.captures(directive).unwrap();

        Self {
            line,
            text: captures["text"].to_owned(),
        }
    }

    pub fn check(&self, run_data: &TestRunData) -> TestResult {
        if run_data.output == self.text {
            TestResult::Passed
        } else {
            eprintln!(
                "The output does not match the directive at line {}:\n  expected: {}\n  actual:   {}",
                self.line, self.text, run_data.output,
            );

            TestResult::Failed
        }
    }
}

static DIRECTIVE_REGEX: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        DIRECTIVE_DIAG_REGEX.as_str(),
        DIRECTIVE_PASS_REGEX.as_str(),
        DIRECTIVE_OUTPUT_REGEX.as_str(),
    ])
    .unwrap()
});

/// Parses an expectation file: one directive per line, blank lines and
/// lines starting with `#` are skipped.
pub fn parse_directives(s: &str) -> Result<Vec<Directive>, String> {
    let mut directives = vec![];

    for (idx, line) in s.lines().enumerate() {
        let directive = line.trim();

        if directive.is_empty() || directive.starts_with('#') {
            continue;
        }

        let matches = DIRECTIVE_REGEX.matches(directive);

        let directive = if matches.matched(0) {
            DirectiveDiag::parse(directive, idx + 1).into()
        } else if matches.matched(1) {
            DirectivePass::parse(directive).into()
        } else if matches.matched(2) {
            DirectiveOutput::parse(directive, idx + 1).into()
        } else {
            return Err(format!("unrecognized directive at line {}", idx + 1));
        };

        directives.push(directive);
    }

    if directives.is_empty() {
        return Err("no directives found".into());
    }

    Ok(directives)
}
