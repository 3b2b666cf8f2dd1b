use std::io::IsTerminal;

use termcolor::{ColorChoice, StandardStream};

pub mod details;
pub mod form;
pub mod input;
pub mod list;
pub mod modal;
pub mod pagination;
pub mod search_box;
pub mod toast;

pub use toast::{Notifier, Toaster};

/// What the user asked for, forwarded from the components to the screen
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Search(String),
    NextPage,
    PrevPage,
    GoToPage(u32),
    /// 1-based list position or note id
    View(String),
    /// 1-based list position or note id
    Delete(String),
    OpenCreate,
    /// A line typed while the creation modal is open
    FormInput(String),
    CloseModal,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(std::io::stdout().is_terminal()))
}

pub fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(std::io::stderr().is_terminal()))
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
