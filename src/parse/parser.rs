use std::borrow::Cow;

use thiserror::Error;

use crate::diag::{Diagnostic, IntoDiagnostic, Label, code};
use crate::location::Position;
use crate::util::{format_iter, quoted};

use super::token::Symbol;
use super::{LexerError, Token, TokenCursor, TokenKind};

/// Keywords that may start a statement, in the order they are reported.
const STMT_STARTERS: [Symbol; 16] = [
    Symbol::Def,
    Symbol::Class,
    Symbol::If,
    Symbol::Elif,
    Symbol::Else,
    Symbol::For,
    Symbol::While,
    Symbol::Try,
    Symbol::Except,
    Symbol::Finally,
    Symbol::Print,
    Symbol::Input,
    Symbol::Return,
    Symbol::Pass,
    Symbol::Break,
    Symbol::Continue,
];

/// How many statements and bracketed operands may enclose one another.
pub const MAX_NESTING: usize = 200;

const BIN_OPS: [Symbol; 13] = [
    Symbol::Plus,
    Symbol::Minus,
    Symbol::Star,
    Symbol::Slash,
    Symbol::Percent,
    Symbol::EqualsEquals,
    Symbol::BangEquals,
    Symbol::LessEquals,
    Symbol::GreaterEquals,
    Symbol::Less,
    Symbol::Greater,
    Symbol::And,
    Symbol::Or,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError<'src> {
    #[error(
        "{} Syntax error: found {}; expected {}.",
        token.pos,
        quoted(token.lexeme),
        format_iter(expected.iter().map(quoted), "or", "nothing"),
    )]
    UnexpectedToken {
        token: Token<'src>,
        expected: Vec<Cow<'static, str>>,
    },

    #[error("{} Syntax error: nesting too deep at {}.", token.pos, quoted(token.lexeme))]
    NestingTooDeep { token: Token<'src> },

    #[error(transparent)]
    LexerError(#[from] LexerError),
}

impl ParserError<'_> {
    pub fn pos(&self) -> Position {
        match self {
            Self::UnexpectedToken { token, .. } | Self::NestingTooDeep { token } => token.pos,
            Self::LexerError(e) => e.pos,
        }
    }

    /// Returns the lexeme of the offending token, if there was one.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { token, .. } | Self::NestingTooDeep { token } => {
                Some(token.lexeme)
            }
            Self::LexerError(_) => None,
        }
    }

    pub fn expected(&self) -> &[Cow<'static, str>] {
        match self {
            Self::UnexpectedToken { expected, .. } => expected,
            Self::NestingTooDeep { .. } | Self::LexerError(_) => &[],
        }
    }
}

impl IntoDiagnostic for ParserError<'_> {
    fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::UnexpectedToken {
                ref token,
                ref expected,
            } => Diagnostic::error()
                .at(token.span)
                .with_msg(format!("unexpected token {}", quoted(token.lexeme)))
                .with_code(code!(parser::unexpected_token))
                .with_label(
                    Label::primary(token.span).with_msg(format!("found {} here", token.kind)),
                )
                .with_note(format!(
                    "expected {}",
                    format_iter(expected.iter().map(quoted), "or", "nothing"),
                ))
                .with_note(format!("reported at {}", token.pos))
                .make(),

            Self::NestingTooDeep { ref token } => Diagnostic::error()
                .at(token.span)
                .with_msg(format!("nesting exceeds {MAX_NESTING} levels"))
                .with_code(code!(parser::nesting_too_deep))
                .with_note(format!("reported at {}", token.pos))
                .make(),

            Self::LexerError(e) => e.into_diagnostic(),
        }
    }
}

trait Matcher {
    fn matches(&self, token: &Token<'_>) -> bool;
}

trait Expected {
    fn expected(&self) -> Vec<Cow<'static, str>>;
}

impl<const N: usize> Matcher for [Symbol; N] {
    fn matches(&self, token: &Token<'_>) -> bool {
        token.as_symbol().is_some_and(|sym| self.contains(&sym))
    }
}

impl<const N: usize> Expected for [Symbol; N] {
    fn expected(&self) -> Vec<Cow<'static, str>> {
        self.iter().map(|sym| sym.to_str().into()).collect()
    }
}

impl Matcher for TokenKind {
    fn matches(&self, token: &Token<'_>) -> bool {
        *self == token.kind
    }
}

impl Matcher for Symbol {
    fn matches(&self, token: &Token<'_>) -> bool {
        token.as_symbol() == Some(*self)
    }
}

impl Expected for Symbol {
    fn expected(&self) -> Vec<Cow<'static, str>> {
        vec![self.to_str().into()]
    }
}

trait IntoExpected {
    fn into_expected(self) -> Vec<Cow<'static, str>>;
}

impl IntoExpected for Vec<Cow<'static, str>> {
    fn into_expected(self) -> Vec<Cow<'static, str>> {
        self
    }
}

impl IntoExpected for &'static str {
    fn into_expected(self) -> Vec<Cow<'static, str>> {
        vec![self.into()]
    }
}

/// Counters gathered over a successful parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// The length of the token sequence, EOF included.
    pub tokens: usize,

    pub statements: usize,
    pub exprs: usize,
}

/// A recursive-descent recognizer with one method per grammar rule.
///
/// The parser stops at the first violation and builds no tree.
pub struct Parser<'src> {
    tokens: TokenCursor<'src>,
    stats: ParseStats,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: TokenCursor<'src>) -> Self {
        Self {
            tokens,
            stats: Default::default(),
            depth: 0,
        }
    }

    /// Runs a rule one nesting level deeper, failing once `MAX_NESTING` is exceeded.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParserError<'src>>,
    ) -> Result<T, ParserError<'src>> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::NestingTooDeep {
                token: *self.tokens.current(),
            });
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;

        result
    }

    fn at(&self, matcher: impl Matcher) -> bool {
        matcher.matches(self.tokens.current())
    }

    fn consume(&mut self, matcher: impl Matcher) -> Option<Token<'src>> {
        self.at(matcher).then(|| self.tokens.advance())
    }

    fn unexpected(&self, expected: impl IntoExpected) -> ParserError<'src> {
        ParserError::UnexpectedToken {
            token: *self.tokens.current(),
            expected: expected.into_expected(),
        }
    }

    fn expect_with_message(
        &mut self,
        matcher: impl Matcher,
        expected: impl IntoExpected,
    ) -> Result<Token<'src>, ParserError<'src>> {
        match self.consume(matcher) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    fn expect(
        &mut self,
        matcher: impl Matcher + Expected,
    ) -> Result<Token<'src>, ParserError<'src>> {
        let expected = matcher.expected();

        self.expect_with_message(matcher, expected)
    }

    pub fn parse(mut self) -> Result<ParseStats, ParserError<'src>> {
        while !self.at(TokenKind::Eof) {
            self.parse_stmt()?;
        }

        self.stats.tokens = self.tokens.len();

        Ok(self.stats)
    }

    fn parse_stmt(&mut self) -> Result<(), ParserError<'src>> {
        self.nested(Self::parse_stmt_inner)
    }

    fn parse_stmt_inner(&mut self) -> Result<(), ParserError<'src>> {
        self.stats.statements += 1;

        match self.tokens.current().kind {
            TokenKind::Symbol(Symbol::Def) => self.parse_func_def(),
            TokenKind::Symbol(Symbol::Class) => self.parse_class_def(),
            TokenKind::Symbol(Symbol::If) => self.parse_if_chain(),
            TokenKind::Symbol(Symbol::Elif | Symbol::Else) => self.parse_dangling_branch(),
            TokenKind::Symbol(Symbol::For) => self.parse_for_loop(),
            TokenKind::Symbol(Symbol::While) => self.parse_while_loop(),
            TokenKind::Symbol(Symbol::Try) => self.parse_try_block(),
            TokenKind::Symbol(Symbol::Except | Symbol::Finally) => self.parse_dangling_handler(),
            TokenKind::Symbol(Symbol::Print | Symbol::Input) => self.parse_builtin_call(),
            TokenKind::Symbol(Symbol::Return) => self.parse_return(),

            TokenKind::Symbol(Symbol::Pass | Symbol::Break | Symbol::Continue) => {
                self.tokens.advance();

                Ok(())
            }

            TokenKind::Ident => self.parse_ident_stmt(),

            _ => Err(self.unexpected(STMT_STARTERS.expected())),
        }
    }

    /// Parses the `: statement` tail shared by every header.
    fn parse_body(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::Colon)?;

        self.parse_stmt()
    }

    fn parse_func_def(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::Def)?;
        self.expect_with_message(TokenKind::Ident, "function name")?;
        self.expect(Symbol::LParen)?;

        if !self.at(Symbol::RParen) {
            self.parse_params()?;
        }

        self.expect(Symbol::RParen)?;

        self.parse_body()
    }

    fn parse_params(&mut self) -> Result<(), ParserError<'src>> {
        loop {
            self.expect_with_message(TokenKind::Ident, "identifier")?;

            if self.consume(Symbol::Comma).is_none() {
                break Ok(());
            }
        }
    }

    fn parse_class_def(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::Class)?;
        self.expect_with_message(TokenKind::Ident, "class name")?;

        if self.consume(Symbol::LParen).is_some() {
            self.parse_expr()?;
            self.expect(Symbol::RParen)?;
        }

        self.parse_body()
    }

    fn parse_if_chain(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::If)?;
        self.parse_expr()?;
        self.parse_body()?;

        while self.consume(Symbol::Elif).is_some() {
            self.parse_expr()?;
            self.parse_body()?;
        }

        if self.consume(Symbol::Else).is_some() {
            self.parse_body()?;
        }

        Ok(())
    }

    // `elif` and `else` are accepted on their own, and take no condition then.
    fn parse_dangling_branch(&mut self) -> Result<(), ParserError<'src>> {
        self.tokens.advance();

        self.parse_body()
    }

    fn parse_for_loop(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::For)?;
        self.expect_with_message(TokenKind::Ident, "identifier")?;
        self.expect(Symbol::In)?;
        self.parse_expr()?;

        self.parse_body()
    }

    fn parse_while_loop(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::While)?;
        self.parse_expr()?;

        self.parse_body()
    }

    fn parse_try_block(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::Try)?;
        self.parse_body()?;

        if self.consume(Symbol::Except).is_some() {
            self.consume(TokenKind::Ident);
            self.parse_body()?;
        }

        if self.consume(Symbol::Finally).is_some() {
            self.parse_body()?;
        }

        Ok(())
    }

    // Outside of a `try`, the colon and the body are optional.
    fn parse_dangling_handler(&mut self) -> Result<(), ParserError<'src>> {
        self.tokens.advance();

        if self.consume(Symbol::Colon).is_some() {
            self.parse_stmt()?;
        }

        Ok(())
    }

    fn parse_builtin_call(&mut self) -> Result<(), ParserError<'src>> {
        self.expect([Symbol::Print, Symbol::Input])?;
        self.expect(Symbol::LParen)?;

        if !self.at(Symbol::RParen) {
            self.parse_expr()?;
        }

        self.expect(Symbol::RParen)?;

        Ok(())
    }

    fn parse_return(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::Return)?;

        if !self.at(Symbol::Colon) && !self.at(TokenKind::Eof) {
            self.parse_expr()?;
        }

        Ok(())
    }

    fn parse_ident_stmt(&mut self) -> Result<(), ParserError<'src>> {
        self.expect_with_message(TokenKind::Ident, "identifier")?;

        if self.consume(Symbol::Equals).is_some() || self.consume(BIN_OPS).is_some() {
            self.parse_expr()?;
        }

        Ok(())
    }

    /// Parses an operand followed by any number of `op operand` continuations.
    ///
    /// There is no precedence: `a * b + c` and `a + b * c` have the same shape.
    fn parse_expr(&mut self) -> Result<(), ParserError<'src>> {
        loop {
            self.stats.exprs += 1;
            self.parse_operand()?;

            if self.consume(BIN_OPS).is_none() {
                break Ok(());
            }
        }
    }

    fn parse_operand(&mut self) -> Result<(), ParserError<'src>> {
        match self.tokens.current().kind {
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Symbol(Symbol::True | Symbol::False | Symbol::None) => {
                self.tokens.advance();

                Ok(())
            }

            TokenKind::Symbol(Symbol::LParen) => self.nested(Self::parse_parenthesized),
            TokenKind::Symbol(Symbol::LBracket) => self.nested(Self::parse_list),
            TokenKind::Symbol(Symbol::LCurly) => self.nested(Self::parse_dict),

            _ => Err(self.unexpected("valid expression")),
        }
    }

    fn parse_parenthesized(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::LParen)?;
        self.parse_expr()?;
        self.expect(Symbol::RParen)?;

        Ok(())
    }

    fn parse_list(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::LBracket)?;

        if !self.at(Symbol::RBracket) {
            self.parse_expr()?;

            while self.consume(Symbol::Comma).is_some() {
                self.parse_expr()?;
            }
        }

        self.expect(Symbol::RBracket)?;

        Ok(())
    }

    // holds at most one `key: value` pair
    fn parse_dict(&mut self) -> Result<(), ParserError<'src>> {
        self.expect(Symbol::LCurly)?;

        if !self.at(Symbol::RCurly) {
            self.parse_expr()?;
            self.expect(Symbol::Colon)?;
            self.parse_expr()?;
        }

        self.expect(Symbol::RCurly)?;

        Ok(())
    }
}
