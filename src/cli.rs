//! CLI argument parsing for Taskline.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tsk",
    about = "A command-line client for the Taskline task service",
    version,
    after_help = "Logs are written to: ~/.local/share/taskline/logs/taskline.log"
)]
pub struct Cli {
    /// Base URL of the task service (default: $TASKLINE_API_URL or http://localhost:5000/api)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in with email and password
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        /// Display name
        name: String,

        /// Account email
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Print the browser URL for OAuth login with a provider
    Oauth {
        /// Provider name (e.g. google, github)
        provider: String,
    },

    /// Complete a login with a token from an OAuth redirect
    Token {
        /// Bearer token from the redirect URL
        token: String,
    },

    /// Log out and forget the stored token
    Logout,

    /// Show the currently authenticated user
    Whoami,

    /// List tasks
    List {
        /// Filter by status (open, complete)
        #[arg(short, long)]
        status: Option<String>,

        /// Case-insensitive search over title and description
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Create a new task
    Add {
        /// Task title
        title: String,

        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Edit a task's fields
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Toggle a task between Open and Complete
    Done {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },

    /// Show open/complete/overdue counts
    Stats,
}
