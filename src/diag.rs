use std::fmt::{self, Display};
use std::io::{self, IsTerminal};

use codespan_reporting::diagnostic::{
    Diagnostic as CsDiagnostic, Label as CsLabel, LabelStyle, Severity,
};
use codespan_reporting::term::{self, Config};
use termcolor::{ColorChoice, StandardStream};

use crate::location::Span;
use crate::sourcemap::SourceFile;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

macro_rules! code {
    ($category:ident :: $name:ident) => {
        $crate::diag::Code::new(concat!(stringify!($category), "::", stringify!($name)))
    };
}

pub(crate) use code;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub style: LabelStyle,
    pub span: Span,
    pub msg: Option<String>,
}

impl Label {
    pub fn primary(span: Span) -> Self {
        Self {
            style: LabelStyle::Primary,
            span,
            msg: None,
        }
    }

    pub fn with_msg(mut self, msg: impl Display) -> Self {
        self.msg = Some(msg.to_string());

        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Code,
    pub msg: String,
    pub span: Option<Span>,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error() -> DiagnosticBuilder {
        DiagnosticBuilder::new(Level::Error)
    }

    /// Converts to a codespan diagnostic. The diagnostic's own span becomes an
    /// unlabeled primary label unless a primary label is already given.
    fn to_codespan(&self) -> CsDiagnostic<()> {
        let has_primary = self.labels.iter().any(|label| label.style == LabelStyle::Primary);
        let implicit = self
            .span
            .filter(|_| !has_primary)
            .map(|span| CsLabel::primary((), span.range()));
        let labels = implicit
            .into_iter()
            .chain(self.labels.iter().map(|label| {
                CsLabel::new(label.style, (), label.span.range())
                    .with_message(label.msg.clone().unwrap_or_default())
            }))
            .collect();

        CsDiagnostic::new(self.level.into())
            .with_message(self.msg.clone())
            .with_code(self.code.code())
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

#[must_use = "call `make` to finish building the diagnostic"]
pub struct DiagnosticBuilder {
    level: Level,
    code: Option<Code>,
    msg: Option<String>,
    span: Option<Span>,
    labels: Vec<Label>,
    notes: Vec<String>,
}

impl DiagnosticBuilder {
    fn new(level: Level) -> Self {
        Self {
            level,
            code: None,
            msg: None,
            span: None,
            labels: vec![],
            notes: vec![],
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);

        self
    }

    pub fn with_msg(mut self, msg: impl Display) -> Self {
        self.msg = Some(msg.to_string());

        self
    }

    pub fn with_code(mut self, code: Code) -> Self {
        self.code = Some(code);

        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);

        self
    }

    pub fn with_note(mut self, note: impl Display) -> Self {
        self.notes.push(note.to_string());

        self
    }

    /// # Panics
    /// Panics if the message or the code was not provided.
    pub fn make(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            code: self.code.expect("the diagnostic code must be set"),
            msg: self.msg.expect("the diagnostic message must be set"),
            span: self.span,
            labels: self.labels,
            notes: self.notes,
        }
    }
}

pub trait IntoDiagnostic {
    fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
    fn into_diagnostic(self) -> Diagnostic {
        self
    }
}

pub trait DiagCtx {
    fn emit(&mut self, diag: impl IntoDiagnostic);
}

pub fn print_to_stderr(diag: &Diagnostic, file: &SourceFile, config: &Config) {
    let color_choice = if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let writer = StandardStream::stderr(color_choice);
    let _ = term::emit(&mut writer.lock(), config, file, &diag.to_codespan());
}

pub struct StderrDiagCtx<'src> {
    file: &'src SourceFile,
    config: Config,
}

impl<'src> StderrDiagCtx<'src> {
    pub fn new(file: &'src SourceFile) -> Self {
        Self {
            file,
            config: Default::default(),
        }
    }
}

impl DiagCtx for StderrDiagCtx<'_> {
    fn emit(&mut self, diag: impl IntoDiagnostic) {
        print_to_stderr(&diag.into_diagnostic(), self.file, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn span_becomes_primary_label_when_none_is_given() {
        let diag = Diagnostic::error()
            .at(Span::new_with_extent(2, 3))
            .with_msg("bad")
            .with_code(code!(parser::nesting_too_deep))
            .make()
            .to_codespan();

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.as_deref(), Some("parser::nesting_too_deep"));
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].style, LabelStyle::Primary);
        assert_eq!(diag.labels[0].range, 2..5);
    }

    #[test]
    fn explicit_primary_label_wins() {
        let diag = Diagnostic::error()
            .at(Span::new_with_extent(0, 8))
            .with_msg("bad")
            .with_code(code!(lexer::unterminated_string))
            .with_label(Label::primary(Span::new_with_extent(0, 1)).with_msg("here"))
            .make()
            .to_codespan();

        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].range, 0..1);
        assert_eq!(diag.labels[0].message, "here");
    }
}
