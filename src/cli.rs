use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Browse the AI SDLC playbook and its prompt library", long_about = None)]
pub struct Cli {
    /// Table collection JSON (defaults to the bundled playbook)
    #[arg(long, global = true, env = "PLAYBOOK_TABLES", value_name = "PATH")]
    pub tables: Option<PathBuf>,
    /// Prompt collection JSON (defaults to the bundled prompts)
    #[arg(long, global = true, env = "PLAYBOOK_PROMPTS", value_name = "PATH")]
    pub prompts: Option<PathBuf>,
    /// Write diagnostics to this file
    #[arg(long, global = true, env = "PLAYBOOK_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch TUI interface
    Tui,
    /// Launch TUI at a shareable location, e.g. "/?table=assess&prompt=true&taskId=1"
    Open {
        #[arg(value_name = "LOCATION")]
        location: String,
    },
    /// List playbook tables
    Tables,
    /// Print one playbook table
    Table {
        #[arg(value_name = "SLUG")]
        slug: String,
    },
    /// List prompts, optionally searched and filtered by area
    Prompts {
        /// Case-insensitive text matched against prompt, area, task and id
        #[arg(short, long)]
        search: Option<String>,
        /// Area label to filter by ("All" disables the filter)
        #[arg(short, long, default_value = "All")]
        area: String,
        /// Number tasks per area, as the task catalog does
        #[arg(long)]
        catalog: bool,
    },
    /// Show one prompt in full
    Prompt {
        #[arg(value_name = "ID")]
        id: usize,
    },
    /// Copy one prompt to the clipboard
    Copy {
        #[arg(value_name = "ID")]
        id: usize,
    },
    /// Show the prompt linked from a table row
    Resolve {
        #[arg(value_name = "SLUG")]
        slug: String,
        #[arg(value_name = "TASK_ID")]
        task_id: String,
    },
    /// Print the shareable location of a table or one of its prompts
    Link {
        #[arg(value_name = "SLUG")]
        slug: String,
        #[arg(long, value_name = "TASK_ID")]
        task_id: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}
