/// A character-level cursor over the source text.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    iter: std::str::Chars<'src>,
    src: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            iter: src.chars(),
            src,
            pos: 0,
        }
    }

    /// Returns the byte offset of the immediately following character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.iter.clone().next()
    }

    pub fn remaining(&self) -> &'src str {
        self.iter.as_str()
    }

    /// Returns the source text between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.src[start..self.pos]
    }

    pub fn consume_n(&mut self, n: usize) -> &'src str {
        let start = self.pos;

        for _ in 0..n {
            self.next();
        }

        self.slice_from(start)
    }
}

impl Iterator for Cursor<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.iter.next()?;
        self.pos += c.len_utf8();

        Some(c)
    }
}
