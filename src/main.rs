mod ack;
mod cli;
mod clipboard;
mod commands;
mod config;
mod crossref;
mod library;
mod logging;
mod models;
mod store;
mod table_view;
mod text;
mod ui;
mod view;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use clipboard::Clipboard;
use config::Config;
use store::DataStore;
use ui::run_tui;
use std::io::Write;
use view::{Location, Screen};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    logging::init(config.log_file.as_deref())?;
    let store = DataStore::load(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Tui) | None => {
            drop(out);
            run_tui(store, Screen::default())?;
        }
        Some(Commands::Open { location }) => {
            drop(out);
            let screen = Screen::from_location(&store, &Location::parse(&location));
            run_tui(store, screen)?;
        }
        Some(Commands::Tables) => {
            commands::list_tables(&store, &mut out)?;
        }
        Some(Commands::Table { slug }) => {
            commands::print_table(&store, &slug, &mut out)?;
        }
        Some(Commands::Prompts { search, area, catalog }) => {
            commands::list_prompts(&store, search.as_deref(), &area, catalog, &mut out)?;
        }
        Some(Commands::Prompt { id }) => {
            commands::show_prompt(&store, id, &mut out)?;
        }
        Some(Commands::Copy { id }) => {
            let mut clipboard = Clipboard::one_shot();
            commands::copy_prompt(&store, id, &mut clipboard, &mut out)?;
        }
        Some(Commands::Resolve { slug, task_id }) => {
            commands::resolve(&store, &slug, &task_id, &mut out)?;
        }
        Some(Commands::Link { slug, task_id }) => {
            commands::link(&store, &slug, task_id.as_deref(), &mut out)?;
        }
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    writeln!(out, "Unsupported shell: {}", shell)?;
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "playbook", &mut out);
        }
    }

    Ok(())
}
