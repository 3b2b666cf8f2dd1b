pub mod browse;
pub mod completions;
pub mod config;
pub mod init;
pub mod note;
pub mod profile;
