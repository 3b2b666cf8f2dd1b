use termcolor::{Color, ColorSpec, WriteColor};

#[derive(Debug, Clone, PartialEq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Transient, user-visible notifications
pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notify(Toast::Error(message.to_string()));
    }
}

/// Prints toasts to stderr so they never mix with rendered output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Toaster;

impl Toaster {
    fn write(out: &mut impl WriteColor, toast: &Toast) -> std::io::Result<()> {
        let (color, icon, message) = match toast {
            Toast::Success(m) => (Color::Green, "✔", m),
            Toast::Error(m) => (Color::Red, "✖", m),
        };

        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{} ", icon)?;
        out.reset()?;
        writeln!(out, "{}", message)
    }
}

impl Notifier for Toaster {
    fn notify(&self, toast: Toast) {
        let mut err = super::stderr();
        if let Err(e) = Self::write(&mut err, &toast) {
            tracing::warn!("Could not print notification: {}", e);
        }
    }
}
