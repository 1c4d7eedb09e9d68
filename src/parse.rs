mod cursor;
mod lexer;
mod parser;
mod token;
mod token_cursor;

pub use cursor::Cursor;
pub use lexer::{Lexer, LexerError, LexerErrorKind};
pub use parser::{MAX_NESTING, ParseStats, Parser, ParserError};
pub use token::{EOF_LEXEME, Symbol, SymbolCategory, Token, TokenKind};
pub use token_cursor::TokenCursor;

use crate::outcome::Outcome;

/// Splits `src` into tokens. The last token is always the EOF sentinel.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexerError> {
    Lexer::new(Cursor::new(src)).tokenize()
}

/// Checks that `src` conforms to the grammar, stopping at the first violation.
pub fn analyze(src: &str) -> Outcome<'_> {
    let result = tokenize(src)
        .map_err(ParserError::from)
        .and_then(|tokens| Parser::new(TokenCursor::new(tokens)).parse());

    match result {
        Ok(_) => Outcome::Success,
        Err(e) => Outcome::Failure(e),
    }
}
