#[derive(clap::Parser, Debug)]
#[command()]
pub struct Args {
    /// Paths of the programs to check. Defaults to every matched program.
    pub tests: Option<Vec<String>>,

    /// Glob pattern locating the programs. Each needs a sibling `.expect` file.
    #[arg(long, default_value = "./tests/programs/**/*.py")]
    pub programs: String,

    /// Stop checking a program's directives after the first failing one.
    #[arg(short = 'x', long)]
    pub first_failure: bool,

    /// Emit diagnostics for all run programs regardless of the result.
    #[arg(short = 'd', long)]
    pub all_diagnostics: bool,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
