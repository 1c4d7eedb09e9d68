use std::cmp::Ordering;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::Path;

use codespan_reporting::files::{self, Files};

/// A loaded source file with its line index.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    contents: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Creates a source file, normalizing `\r\n` and lone `\r` line endings to `\n`.
    pub fn new(name: String, contents: String) -> Self {
        let contents = if contents.contains('\r') {
            contents.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            contents
        };
        let line_starts = files::line_starts(&contents).collect();

        Self {
            name,
            contents,
            line_starts,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        Ok(Self::new(path.display().to_string(), contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    fn line_start(&self, line_index: usize) -> Result<usize, files::Error> {
        match line_index.cmp(&self.line_starts.len()) {
            Ordering::Less => Ok(self.line_starts[line_index]),
            Ordering::Equal => Ok(self.contents.len()),
            Ordering::Greater => Err(files::Error::LineTooLarge {
                given: line_index,
                max: self.line_starts.len() - 1,
            }),
        }
    }
}

impl<'a> Files<'a> for SourceFile {
    type FileId = ();
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, (): ()) -> Result<&'a str, files::Error> {
        Ok(&self.name)
    }

    fn source(&'a self, (): ()) -> Result<&'a str, files::Error> {
        Ok(&self.contents)
    }

    fn line_index(&'a self, (): (), byte_index: usize) -> Result<usize, files::Error> {
        Ok(self
            .line_starts
            .binary_search(&byte_index)
            .unwrap_or_else(|next_line| next_line - 1))
    }

    fn line_range(&'a self, (): (), line_index: usize) -> Result<Range<usize>, files::Error> {
        Ok(self.line_start(line_index)?..self.line_start(line_index + 1)?)
    }
}
