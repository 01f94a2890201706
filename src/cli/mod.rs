use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod auth;
pub mod display;
pub mod editor;
pub mod menu;
pub mod notes;
pub mod settings;
pub mod ui;

pub use auth::{run_forgot_password, run_login, run_logout, run_signup, run_theme};
pub use display::Palette;
pub use editor::run_draft;
pub use menu::run_menu;
pub use notes::{run_add, run_delete, run_edit, run_list, run_notes_screen};
pub use settings::{run_config_clear, run_config_set, run_config_show};

use crate::models::NoteId;
use crate::store::KeyValueStore;
use crate::views::HeaderView;

#[derive(Parser)]
#[command(name = "notecmd")]
#[command(about = "Note-taking client for the command line")]
#[command(version)]
pub struct Cli {
    /// Notes server base URL (overrides NOTECMD_API_URL and stored config)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and keep the session token
    Login(AccountArgs),
    /// Create an account
    Signup(AccountArgs),
    /// Request a password reset link
    ForgotPassword {
        email: Option<String>,
    },
    /// Forget the session token
    Logout,
    /// List notes, optionally filtered by a search query
    List {
        query: Option<String>,
    },
    /// Create a note
    Add(NoteArgs),
    /// Change a note
    Edit {
        id: NoteId,
        #[command(flatten)]
        fields: NoteArgs,
    },
    /// Delete a note
    Delete {
        id: NoteId,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Open the draft editor
    Draft {
        /// Ctrl-S publishes the draft as a note with this title
        #[arg(long, value_name = "TITLE")]
        publish: Option<String>,
    },
    /// Turn dark mode on or off (toggles without an argument)
    Theme {
        #[arg(value_enum)]
        mode: Option<Switch>,
    },
    /// Show or change stored settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
pub struct AccountArgs {
    #[arg(short, long)]
    pub username: Option<String>,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub content: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub tags: Option<String>,
    /// YYYY-MM-DD (defaults to today for new notes)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Store a setting (api_url, request_timeout_secs, form_reset)
    Set { key: String, value: String },
    /// Remove all stored settings
    Clear,
}

/// Output colours for the stored dark-mode preference.
pub fn palette<S: KeyValueStore>(store: S) -> Result<Palette> {
    Ok(Palette::new(HeaderView::mount(store)?.dark_mode()))
}
