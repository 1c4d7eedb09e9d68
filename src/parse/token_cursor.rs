use super::token::Token;

/// A forward-only view over a token sequence ending with the EOF sentinel.
#[derive(Debug, Clone)]
pub struct TokenCursor<'src> {
    tokens: Vec<Token<'src>>,
    idx: usize,
}

impl<'src> TokenCursor<'src> {
    /// # Panics
    /// Panics if `tokens` does not end with an EOF token.
    pub fn new(tokens: Vec<Token<'src>>) -> Self {
        assert!(
            tokens.last().is_some_and(Token::is_eof),
            "the token sequence must end with an EOF token",
        );

        Self { tokens, idx: 0 }
    }

    pub fn current(&self) -> &Token<'src> {
        &self.tokens[self.idx]
    }

    /// Moves to the next token. The cursor stays on the EOF token once it reaches it.
    pub fn advance(&mut self) -> Token<'src> {
        let token = *self.current();

        if !token.is_eof() {
            self.idx += 1;
        }

        token
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
