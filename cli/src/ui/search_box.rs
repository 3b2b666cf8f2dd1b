use std::io;

use termcolor::{ColorSpec, WriteColor};

pub fn render(out: &mut impl WriteColor, value: &str, pending: bool) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "Search: ")?;
    out.reset()?;

    if value.is_empty() {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "type /text to search notes")?;
        out.reset()?;
    } else {
        write!(out, "{}", value)?;
    }

    if pending {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, " …")?;
        out.reset()?;
    }

    writeln!(out)
}
