#![allow(clippy::unwrap_used)]

mod notes_screen;
