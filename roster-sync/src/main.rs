use clap::Parser;
use colored::*;

mod api;
mod cli;
mod config;
mod roster;
mod sync;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Pick up MAILCHIMP_* from a local .env if present
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .format_timestamp(None)
        .init();

    if let Err(e) = cli::handle_sync_command(args).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
