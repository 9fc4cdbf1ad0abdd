use std::path::PathBuf;

use crate::cli::Cli;

pub const LOG_FILTER_ENV: &str = "PLAYBOOK_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where the fixtures come from and where diagnostics go.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tables_path: Option<PathBuf>,
    pub prompts_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            tables_path: cli.tables.clone(),
            prompts_path: cli.prompts.clone(),
            log_file: cli.log_file.clone(),
        }
    }
}
