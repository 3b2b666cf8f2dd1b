use std::io;

use notehub_core::{Note, NoteTag, NotesPage};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::args::OutputFormat;

pub struct NoteListFormatter {
    output: OutputFormat,
    /// Content lines shown per note, `None` for all
    lines: Option<usize>,
}

impl NoteListFormatter {
    pub fn new(output: OutputFormat) -> Self {
        Self {
            output,
            lines: None,
        }
    }

    pub fn with_lines(mut self, lines: Option<usize>) -> Self {
        self.lines = lines;
        self
    }

    pub fn print_page(&self, out: &mut impl WriteColor, page: &NotesPage) -> io::Result<()> {
        match self.output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(page)?;
                writeln!(out, "{}", json)
            }
            _ => self.print_notes(out, &page.notes),
        }
    }

    pub fn print_notes(&self, out: &mut impl WriteColor, notes: &[Note]) -> io::Result<()> {
        match self.output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(notes)?;
                writeln!(out, "{}", json)
            }
            _ if notes.is_empty() => writeln!(out, "No notes yet."),
            OutputFormat::Plain => {
                for note in notes {
                    writeln!(out, "{}\t{}\t{}", note.id, note.tag, note.title)?;
                }
                Ok(())
            }
            OutputFormat::Pretty => {
                for (index, note) in notes.iter().enumerate() {
                    self.print_pretty(out, index + 1, note)?;
                }
                Ok(())
            }
        }
    }

    fn print_pretty(&self, out: &mut impl WriteColor, position: usize, note: &Note) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "[{}] ", position)?;
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{}", note.title)?;
        out.reset()?;
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(tag_color(note.tag))))?;
        write!(out, "#{}", note.tag)?;
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "  ({})", note.id)?;
        out.reset()?;

        let lines = note.content.lines();
        let shown: Vec<&str> = match self.lines {
            Some(n) => lines.take(n).collect(),
            None => lines.collect(),
        };
        for line in shown {
            writeln!(out, "    {}", line)?;
        }

        writeln!(out)
    }
}

pub fn tag_color(tag: NoteTag) -> Color {
    match tag {
        NoteTag::Todo => Color::Yellow,
        NoteTag::Work => Color::Blue,
        NoteTag::Personal => Color::Magenta,
        NoteTag::Meeting => Color::Cyan,
        NoteTag::Shopping => Color::Green,
    }
}
