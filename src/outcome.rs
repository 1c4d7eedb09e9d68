use std::fmt::{self, Display};

use crate::parse::ParserError;

pub const SUCCESS_MESSAGE: &str = "Syntax analysis finished successfully.";

/// The result of analyzing a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'src> {
    Success,
    Failure(ParserError<'src>),
}

impl<'src> Outcome<'src> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&ParserError<'src>> {
        match self {
            Self::Success => None,
            Self::Failure(e) => Some(e),
        }
    }

    pub fn into_error(self) -> Option<ParserError<'src>> {
        match self {
            Self::Success => None,
            Self::Failure(e) => Some(e),
        }
    }
}

/// Renders the single line written to the output file.
impl Display for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str(SUCCESS_MESSAGE),
            Self::Failure(e) => e.fmt(f),
        }
    }
}
