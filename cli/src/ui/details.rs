use std::io;

use chrono::Local;
use notehub_core::Note;
use termcolor::{ColorSpec, WriteColor};

use super::list::tag_color;
use crate::args::OutputFormat;

pub const LOADING_TEXT: &str = "Loading, please wait...";
pub const FAILURE_TEXT: &str = "Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    Failed,
    Loaded(&'a Note),
}

pub fn render(out: &mut impl WriteColor, view: DetailView<'_>, output: &OutputFormat) -> io::Result<()> {
    let note = match view {
        DetailView::Loading => return writeln!(out, "{}", LOADING_TEXT),
        DetailView::Failed => return writeln!(out, "{}", FAILURE_TEXT),
        DetailView::Loaded(note) => note,
    };

    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(note)?),
        OutputFormat::Plain => {
            writeln!(out, "{}", note.title)?;
            writeln!(out, "{}", note.content)?;
            writeln!(out, "{}", created_label(note))
        }
        OutputFormat::Pretty => {
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{}", note.title)?;
            out.reset()?;
            out.set_color(ColorSpec::new().set_fg(Some(tag_color(note.tag))))?;
            writeln!(out, "  #{}", note.tag)?;
            out.reset()?;

            writeln!(out)?;
            if !note.content.is_empty() {
                writeln!(out, "{}", note.content)?;
                writeln!(out)?;
            }

            out.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(out, "{}", created_label(note))?;
            out.reset()
        }
    }
}

fn created_label(note: &Note) -> String {
    note.created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{TimeZone, Utc};
    use notehub_core::NoteTag;
    use termcolor::NoColor;

    fn render_text(view: DetailView<'_>, output: OutputFormat) -> String {
        let mut out = NoColor::new(Vec::new());
        render(&mut out, view, &output).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_failure_is_generic() {
        assert_eq!(
            render_text(DetailView::Failed, OutputFormat::Pretty),
            "Something went wrong.\n"
        );
    }

    #[test]
    fn test_loading() {
        assert_eq!(
            render_text(DetailView::Loading, OutputFormat::Json),
            "Loading, please wait...\n"
        );
    }

    #[test]
    fn test_loaded_note() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let note = Note {
            id: "n1".to_string(),
            title: "Groceries".to_string(),
            content: "milk".to_string(),
            tag: NoteTag::Shopping,
            created_at: created,
            updated_at: created,
        };

        let text = render_text(DetailView::Loaded(&note), OutputFormat::Pretty);

        assert!(text.starts_with("Groceries  #Shopping\n"));
        assert!(text.contains("milk"));
        assert!(text.contains(&created.with_timezone(&Local).format("%Y-%m-%d").to_string()));
    }
}
