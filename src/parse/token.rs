use std::fmt::{self, Display};

use phf::phf_map;

use crate::location::{Position, Span};
use crate::util::try_match;

/// The lexeme carried by the end-of-input sentinel.
pub const EOF_LEXEME: &str = "EOF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub pos: Position,
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Creates a token, resolving its kind from the lexeme.
    pub fn new(lexeme: &'src str, pos: Position, span: Span) -> Self {
        Self {
            kind: TokenKind::classify(lexeme),
            lexeme,
            pos,
            span,
        }
    }

    pub fn eof(pos: Position, offset: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: EOF_LEXEME,
            pos,
            span: Span::new_with_extent(offset, 0),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        try_match!(self.kind, TokenKind::Symbol(sym) => sym)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Symbol(Symbol),
    Ident,
    Number,
    String,

    /// A run of characters that is neither a keyword, a number, nor an identifier.
    Word,
}

impl TokenKind {
    pub fn classify(lexeme: &str) -> Self {
        if let Some(sym) = Symbol::parse_exact(lexeme) {
            Self::Symbol(sym)
        } else if is_string_shaped(lexeme) {
            Self::String
        } else if is_number(lexeme) {
            Self::Number
        } else if is_ident(lexeme) {
            Self::Ident
        } else {
            Self::Word
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, Self::Symbol(sym) if sym.category() == SymbolCategory::Keyword)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "end of input"),
            Self::Symbol(sym) if self.is_keyword() => write!(f, "keyword `{sym}`"),
            Self::Symbol(sym) => write!(f, "`{sym}`"),
            Self::Ident => write!(f, "identifier"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string literal"),
            Self::Word => write!(f, "word"),
        }
    }
}

// Only the outer characters are inspected, so a lone quote passes too.
fn is_string_shaped(lexeme: &str) -> bool {
    ['"', '\''].into_iter().any(|quote| lexeme.starts_with(quote) && lexeme.ends_with(quote))
}

fn is_number(lexeme: &str) -> bool {
    !lexeme.is_empty() && lexeme.chars().all(char::is_numeric)
}

fn is_ident(lexeme: &str) -> bool {
    let mut chars = lexeme.chars();

    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

macro_rules! symbols {
    {
        $(
            $cat:ident {
                $($lit:literal => $variant:ident),+ $(,)?
            }
        )+
    } => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Symbol {
            $($($variant,)+)+
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SymbolCategory {
            $($cat,)+
        }

        const fn has_lengths<const N: usize>(values: &[usize]) -> [bool; N] {
            let mut result = [false; N];
            let mut i = 0;

            while i < values.len() {
                result[values[i] - 1] = true;
                i += 1;
            }

            result
        }

        const fn count_true(values: &[bool]) -> usize {
            let mut result = 0;
            let mut i = 0;

            while i < values.len() {
                if values[i] {
                    result += 1;
                }

                i += 1;
            }

            result
        }

        // Lists the lengths flagged in `values`, longest first.
        const fn flagged_lengths<const N: usize>(values: &[bool]) -> [usize; N] {
            let mut result = [0usize; N];
            let mut rd = 0;
            let mut wr = 0;

            while rd < values.len() {
                let i = values.len() - rd - 1;

                if values[i] {
                    result[wr] = i + 1;
                    wr += 1;
                }

                rd += 1;
            }

            result
        }

        impl Symbol {
            const SYMBOLS: phf::Map<&'static str, Symbol> = phf_map! {
                $($($lit => Self::$variant,)+)+
            };

            const MAX_LENGTH: usize = const {
                let values = [$($($lit.len(),)+)+];
                let mut result = 0;
                let mut i = 0;

                while i < values.len() {
                    if values[i] > result {
                        result = values[i];
                    }

                    i += 1;
                }

                result
            };

            const LENGTHS: &[usize] = &[$($($lit.len(),)+)+];
            const HAS_LENGTHS: [bool; Self::MAX_LENGTH] = has_lengths(Self::LENGTHS);
            const PREFIX_LENGTHS_SIZE: usize = count_true(&Self::HAS_LENGTHS);

            const PREFIX_LENGTHS: [usize; Self::PREFIX_LENGTHS_SIZE] =
                flagged_lengths(&Self::HAS_LENGTHS);

            /// Matches the longest symbol `input` starts with.
            pub fn parse_prefix(input: &str) -> Option<Self> {
                Self::PREFIX_LENGTHS
                    .iter()
                    .filter_map(|&len| input.get(0..len))
                    .find_map(|prefix| Self::SYMBOLS.get(prefix))
                    .copied()
            }

            pub fn parse_exact(input: &str) -> Option<Self> {
                Self::SYMBOLS.get(input).copied()
            }

            pub fn to_str(self) -> &'static str {
                match self {
                    $($(Self::$variant => $lit,)+)+
                }
            }

            pub fn category(self) -> SymbolCategory {
                match self {
                    $($(Self::$variant => SymbolCategory::$cat,)+)+
                }
            }
        }
    };
}

symbols! {
    Keyword {
        "False" => False,
        "None" => None,
        "True" => True,
        "and" => And,
        "as" => As,
        "assert" => Assert,
        "async" => Async,
        "await" => Await,
        "break" => Break,
        "class" => Class,
        "continue" => Continue,
        "def" => Def,
        "del" => Del,
        "elif" => Elif,
        "else" => Else,
        "except" => Except,
        "finally" => Finally,
        "for" => For,
        "from" => From,
        "global" => Global,
        "if" => If,
        "import" => Import,
        "in" => In,
        "input" => Input,
        "is" => Is,
        "lambda" => Lambda,
        "nonlocal" => Nonlocal,
        "not" => Not,
        "or" => Or,
        "pass" => Pass,
        "print" => Print,
        "raise" => Raise,
        "return" => Return,
        "try" => Try,
        "while" => While,
        "with" => With,
        "yield" => Yield,
    }

    Punct {
        "(" => LParen,
        ")" => RParen,
        "[" => LBracket,
        "]" => RBracket,
        "{" => LCurly,
        "}" => RCurly,
        ":" => Colon,
        "," => Comma,
        "." => Dot,
        ";" => Semicolon,
        "=" => Equals,
        "+" => Plus,
        "-" => Minus,
        "*" => Star,
        "/" => Slash,
        "%" => Percent,
        "<" => Less,
        ">" => Greater,
        "!" => Bang,
        "==" => EqualsEquals,
        "!=" => BangEquals,
        "<=" => LessEquals,
        ">=" => GreaterEquals,
        "**" => StarStar,
        "//" => SlashSlash,
    }
}
