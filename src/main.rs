mod cli;

use std::fs;
use std::process::ExitCode;

use snakecheck::diag::{DiagCtx, StderrDiagCtx};
use snakecheck::parse;
use snakecheck::sourcemap::SourceFile;
use yansi::Paint;

use self::cli::Args;

const INPUT_NOT_FOUND: &str = "input file not found";

fn dump_tokens(file: &SourceFile) {
    match parse::tokenize(file.contents()) {
        Ok(tokens) => {
            for token in tokens {
                eprintln!("{} {} {:?}", token.pos.dim(), token.kind, token.lexeme);
            }
        }

        Err(e) => eprintln!("{}: {e}", "Tokenization failed".bright_red().bold()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file = match SourceFile::load(&args.input) {
        Ok(file) => file,

        Err(e) => {
            println!("{INPUT_NOT_FOUND}");
            eprintln!(
                "{}: could not read `{}`: {e}",
                "Error".bright_red().bold(),
                args.input.display(),
            );

            return ExitCode::from(2);
        }
    };

    if args.dump_tokens {
        dump_tokens(&file);
    }

    let outcome = parse::analyze(file.contents());
    let line = outcome.to_string();

    if let Err(e) = fs::write(&args.output, format!("{line}\n")) {
        eprintln!(
            "{}: could not write `{}`: {e}",
            "Error".bright_red().bold(),
            args.output.display(),
        );

        return ExitCode::from(2);
    }

    println!("{line}");

    match outcome.into_error() {
        None => ExitCode::SUCCESS,

        Some(e) => {
            if args.diagnostics {
                StderrDiagCtx::new(&file).emit(e);
            }

            ExitCode::FAILURE
        }
    }
}
