use std::{io::Write, ops::Range, path::PathBuf};

use codespan_reporting::{
    diagnostic::{Diagnostic as CodespanDiagnostic, Label as CodespanLabel, LabelStyle},
    files::SimpleFile,
    term::{self, Config},
};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::src_span::SrcSpan;

pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan
}

impl Label {
    /// Byte range clamped into the source. EOF errors sit at `src_len`,
    /// which codespan would otherwise reject.
    fn range(&self, src_len: usize) -> Range<usize> {
        let start = (self.span.start as usize).min(src_len);
        let end = (self.span.end as usize).clamp(start, src_len);

        start..end
    }

    fn to_codespan_label(&self, style: LabelStyle, src_len: usize) -> CodespanLabel<()> {
        let label = CodespanLabel::new(style, (), self.range(src_len));

        match &self.text {
            Some(text) => label.with_message(text),
            None => label,
        }
    }
}

pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub label: Label,
    pub extra_labels: Vec<Label>,
}

/// A fatal error ready to be rendered, with or without a source excerpt.
pub struct Diagnostic<'a> {
    pub title: String,
    pub text: String,
    pub hint: Option<String>,
    pub location: Option<Location<'a>>
}

impl<'a> Diagnostic<'a> {
    pub fn write(&self, buf: &mut Buffer) {
        match &self.location {
            Some(location) => self.write_excerpt(location, buf),
            None => self.write_plain(buf),
        }
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();

        if !self.text.is_empty() {
            notes.push(self.text.clone());
        }
        if let Some(hint) = &self.hint {
            notes.push(format!("hint: {hint}"));
        }

        notes
    }

    fn write_excerpt(&self, location: &Location, buf: &mut Buffer) {
        let file = SimpleFile::new(location.path.to_string_lossy(), location.src);
        let src_len = location.src.len();

        let labels = std::iter::once(location.label.to_codespan_label(LabelStyle::Primary, src_len))
            .chain(location.extra_labels.iter()
                .map(|label| label.to_codespan_label(LabelStyle::Secondary, src_len)))
            .collect();

        let diagnostic = CodespanDiagnostic::error()
            .with_message(&self.title)
            .with_labels(labels)
            .with_notes(self.notes());

        term::emit(buf, &Config::default(), &file, &diagnostic)
            .expect("write_diagnostic");
    }

    fn write_plain(&self, buf: &mut Buffer) {
        buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Red)))
            .expect("write_title_color");
        write!(buf, "error").expect("write_title_kind");

        buf.set_color(ColorSpec::new().set_bold(true))
            .expect("write_title_color");
        writeln!(buf, ": {}", self.title).expect("write_title_title");

        buf.reset().expect("write_title_reset");

        for note in self.notes() {
            writeln!(buf, "  = {note}").expect("write_note");
        }
    }
}
