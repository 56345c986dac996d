//! Command line interface

pub mod handler;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub use handler::handle_sync_command;

/// Sync a district roster spreadsheet into a Mailchimp audience
#[derive(Parser, Debug)]
#[command(name = "roster-sync", version, about)]
pub struct Cli {
    /// Roster spreadsheet (.xlsx, .xls or .ods)
    pub file: PathBuf,

    /// Config file (defaults to <config dir>/roster-sync/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target Mailchimp list name
    #[arg(long, value_name = "NAME")]
    pub list: Option<String>,

    /// Worksheet holding the roster
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Skip worksheet rows numbered below N
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub start_row: usize,

    /// Perform lookups but only report the writes that would be sent
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default `env_logger` filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
