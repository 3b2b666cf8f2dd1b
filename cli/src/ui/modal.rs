use std::io;

use termcolor::{ColorSpec, WriteColor};

const WIDTH: usize = 48;

/// Lines that close the open modal: `:cancel`, `:q`, or a bare Escape.
pub fn is_close_request(line: &str) -> bool {
    matches!(line.trim(), ":cancel" | ":q" | "\u{1b}")
}

/// Draws a framed dialog around whatever `body` renders.
pub fn render<W, F>(out: &mut W, title: &str, body: F) -> io::Result<()>
where
    W: WriteColor,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    let label = format!(" {} ", title);
    let fill = WIDTH.saturating_sub(label.chars().count() + 2);

    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "┌─{}{}┐", label, "─".repeat(fill))?;
    out.reset()?;

    body(out)?;

    out.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(out, "(type :cancel to close)")?;
    out.reset()?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "└{}┘", "─".repeat(WIDTH - 2))?;
    out.reset()
}
