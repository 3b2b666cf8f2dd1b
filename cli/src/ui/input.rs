use super::{modal, Intent};

/// Turns one line typed in `browse` into an intent.
///
/// While the modal is open every line belongs to the form, except the
/// close requests.
pub fn parse_line(line: &str, modal_open: bool) -> Intent {
    if modal_open {
        if modal::is_close_request(line) {
            return Intent::CloseModal;
        }
        return Intent::FormInput(line.to_string());
    }

    if let Some(text) = line.trim_start().strip_prefix('/') {
        return Intent::Search(text.trim().to_string());
    }

    let trimmed = line.trim();
    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (trimmed, ""),
    };

    match (command, arg) {
        ("search" | "s", text) => Intent::Search(text.to_string()),
        ("n" | "next", "") => Intent::NextPage,
        ("p" | "prev", "") => Intent::PrevPage,
        ("page" | "g", n) => match n.parse() {
            Ok(n) => Intent::GoToPage(n),
            Err(_) => Intent::Unknown(trimmed.to_string()),
        },
        ("v" | "view", target) if !target.is_empty() => Intent::View(target.to_string()),
        ("d" | "delete", target) if !target.is_empty() => Intent::Delete(target.to_string()),
        ("c" | "create", "") => Intent::OpenCreate,
        ("r" | "refresh" | "", "") => Intent::Refresh,
        ("h" | "help" | "?", "") => Intent::Help,
        ("q" | "quit" | "exit", "") => Intent::Quit,
        _ => Intent::Unknown(trimmed.to_string()),
    }
}

pub const HELP: &str = "\
Commands:
  /text          search notes (/ alone clears the search)
  n, p           next / previous page
  page N         jump to page N
  v N|ID         view a note by list position or id
  d N|ID         delete a note
  c              create a note
  r              refresh
  q              quit";
