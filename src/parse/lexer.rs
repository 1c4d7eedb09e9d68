use thiserror::Error;

use crate::diag::{Diagnostic, IntoDiagnostic, Label, code};
use crate::location::{Position, Span};

use super::cursor::Cursor;
use super::token::{Symbol, SymbolCategory, Token};

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("{pos} Syntax error: {kind}.")]
pub struct LexerError {
    pub kind: LexerErrorKind,

    /// Where the scanner stood when it gave up.
    pub pos: Position,

    pub span: Span,
}

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum LexerErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString { opened_at: Position },
}

impl IntoDiagnostic for LexerError {
    fn into_diagnostic(self) -> Diagnostic {
        match self.kind {
            LexerErrorKind::UnterminatedString { opened_at } => Diagnostic::error()
                .at(self.span)
                .with_msg(self.kind)
                .with_code(code!(lexer::unterminated_string))
                .with_label(
                    Label::primary(Span::new_with_extent(self.span.start(), 1))
                        .with_msg("the string literal starts here"),
                )
                .with_note(format!(
                    "the literal was opened at {opened_at}, and the input ended at {}",
                    self.pos,
                ))
                .make(),
        }
    }
}

/// Splits source text into positioned tokens.
///
/// Characters that are neither blanks, quotes nor punctuation accumulate
/// into a pending word, which is flushed as a single token when any of
/// those is encountered. Every token is stamped with the line and column
/// counters as they are when it is flushed.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    line: usize,
    column: usize,
    word_start: Option<usize>,
    tokens: Vec<Token<'src>>,
}

impl Lexer<'_> {
    fn is_blank(c: char) -> bool {
        c == ' ' || c == '\t'
    }

    fn is_quote(c: char) -> bool {
        c == '"' || c == '\''
    }

    fn punct_prefix(input: &str) -> Option<Symbol> {
        // keywords start with a letter, so they never shadow punctuation here
        Symbol::parse_prefix(input).filter(|sym| sym.category() == SymbolCategory::Punct)
    }
}

impl<'src> Lexer<'src> {
    pub fn new(cursor: Cursor<'src>) -> Self {
        Self {
            cursor,
            line: 1,
            column: 1,
            word_start: None,
            tokens: vec![],
        }
    }

    pub fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token<'src>>, LexerError> {
        while let Some(c) = self.cursor.peek() {
            match c {
                '\n' => self.scan_newline(),
                c if Self::is_blank(c) => self.scan_blank(),
                c if Self::is_quote(c) => self.scan_string(c)?,

                _ => match Self::punct_prefix(self.cursor.remaining()) {
                    Some(sym) => self.scan_symbol(sym),
                    None => self.scan_word_char(),
                },
            }
        }

        self.flush_word();
        let eof = Token::eof(self.pos(), self.cursor.pos());
        self.tokens.push(eof);

        Ok(self.tokens)
    }

    fn push(&mut self, lexeme: &'src str, pos: Position, start: usize) {
        let span = Span::new_with_extent(start, lexeme.len());
        self.tokens.push(Token::new(lexeme, pos, span));
    }

    fn flush_word(&mut self) {
        if let Some(start) = self.word_start.take() {
            let lexeme = self.cursor.slice_from(start);
            self.push(lexeme, self.pos(), start);
        }
    }

    fn scan_newline(&mut self) {
        // the counters move first, so a word ended by a newline is stamped
        // with the start of the next line
        self.line += 1;
        self.column = 1;
        self.flush_word();
        self.cursor.next();
    }

    fn scan_blank(&mut self) {
        self.flush_word();
        self.cursor.next();
        self.column += 1;
    }

    fn scan_word_char(&mut self) {
        self.word_start.get_or_insert(self.cursor.pos());
        self.cursor.next();
        self.column += 1;
    }

    fn scan_symbol(&mut self, sym: Symbol) {
        self.flush_word();
        let start = self.cursor.pos();
        let lexeme = self.cursor.consume_n(sym.to_str().chars().count());
        self.push(lexeme, self.pos(), start);
        self.column += lexeme.chars().count();
    }

    fn scan_string(&mut self, quote: char) -> Result<(), LexerError> {
        // a word directly followed by a quote is dropped
        self.word_start = None;

        let start = self.cursor.pos();
        let opened_at = self.pos();
        self.cursor.next();
        self.column += 1;

        loop {
            match self.cursor.peek() {
                None => {
                    return Err(LexerError {
                        kind: LexerErrorKind::UnterminatedString { opened_at },
                        pos: self.pos(),
                        span: (start..self.cursor.pos()).into(),
                    });
                }

                Some(c) if c == quote => {
                    self.cursor.next();
                    self.column += 1;

                    break;
                }

                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                        self.column = 1;
                    }

                    self.cursor.next();
                    self.column += 1;
                }
            }
        }

        let lexeme = self.cursor.slice_from(start);
        let pos = Position::new(self.line, opened_at.column);
        self.push(lexeme, pos, start);

        Ok(())
    }
}
