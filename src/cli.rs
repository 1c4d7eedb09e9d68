use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Checks a source file against a restricted Python-like grammar")]
pub struct Args {
    /// Path to the source file.
    pub input: PathBuf,

    /// File the outcome line is written to. Overwritten if it exists.
    #[arg(short, long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Also render a source-annotated diagnostic when the analysis fails.
    #[arg(short = 'd', long)]
    pub diagnostics: bool,

    /// Print the token sequence to stderr before parsing.
    #[arg(long)]
    pub dump_tokens: bool,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
