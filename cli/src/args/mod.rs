use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "notehub",
    version,
    about,
    long_about = "Terminal client for the NoteHub notes service"
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct ConfigArgs {
    /// Profile name or path to a profile configuration file
    #[arg(long, short, env = "NOTEHUB_PROFILE", global = true)]
    pub profile_path: Option<String>,

    /// Base URL of the notes API
    #[arg(long, env = "NOTEHUB_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "NOTEHUB_TOKEN", hide_env_values = true, global = true)]
    #[serde(skip)]
    pub token: Option<String>,

    /// Print debug logs to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Prints out current configuration
    Config,
    /// Initializes a new profile
    Init,
    /// Manage profiles
    Profile {
        #[clap(subcommand)]
        command: Option<ProfileCommand>,
    },
    /// Prints shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Notes subcommands
    #[clap(subcommand)]
    Note(NoteCommand),
    /// Interactive notes list with search, paging and a create form
    Browse(BrowseArgs),
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ProfileCommand {
    /// Switch to a profile, creating it if needed
    Use { name: String },
    /// List available profiles
    List,
    /// Show the active profile
    Current,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum NoteCommand {
    /// Lists one page of notes.
    List(NoteListArgs),
    /// Shows a single note.
    Show(NoteShowArgs),
    /// Creates a new note.
    Create(NoteCreateArgs),
    /// Deletes notes.
    Delete(NoteDeleteArgs),
}

#[derive(Debug, Default, Clone, ValueEnum, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Plain,
    Json,
}

#[derive(Debug, clap::Args, PartialEq, Serialize, Deserialize)]
#[command(about = "Search and list notes")]
pub struct NoteListArgs {
    /// Search term to filter notes
    #[arg(default_value = None)]
    pub term: Option<String>,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Notes per page (defaults to the profile setting)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// Number of lines to display for each note (default: full content)
    #[arg(long, value_name = "N")]
    pub lines: Option<usize>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

impl Default for NoteListArgs {
    fn default() -> Self {
        Self {
            term: None,
            page: 1,
            per_page: None,
            lines: None,
            output: OutputFormat::Pretty,
        }
    }
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteShowArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteCreateArgs {
    /// Note title (3-50 characters)
    #[arg(long, short)]
    pub title: Option<String>,
    /// Note content (up to 500 characters)
    #[arg(long, short)]
    pub content: Option<String>,
    /// One of Todo, Work, Personal, Meeting, Shopping
    #[arg(long, default_value = "Todo")]
    pub tag: String,
    /// Open in external editor for interactive editing
    #[arg(long, short, default_value_t = false)]
    pub interactive: bool,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteDeleteArgs {
    /// Note ID(s) to delete
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct BrowseArgs {
    /// Initial search term
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Initial page
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}
