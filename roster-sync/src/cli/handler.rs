//! Sync command handler

use std::time::Instant;

use anyhow::{Context, Result, bail};
use colored::*;
use log::debug;

use super::Cli;
use crate::api::{DryRunGateway, Gateway, MailchimpClient, Operation};
use crate::config::Config;
use crate::roster::{RosterRow, read_roster};
use crate::sync::{Directory, RowFailure, SyncReport, sync_roster};

/// Resolve settings, read the roster and run the sync
pub async fn handle_sync_command(args: Cli) -> Result<()> {
    // Handle --no-color flag
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(list) = args.list {
        config.list_name = list;
    }
    if let Some(sheet) = args.sheet {
        config.sheet_name = sheet;
    }
    debug!("Effective config: {:?}", config);

    // Fail on a missing key before touching the network
    let api_key = config.api_key()?.to_string();

    if !args.file.exists() {
        bail!("Roster file does not exist: {}", args.file.display());
    }

    let rows = read_roster(&args.file, &config.sheet_name)?;
    println!("Excel sheet has {} entries", rows.len());

    let client = MailchimpClient::new(
        &config.api_url,
        config.username.as_str(),
        api_key,
        config.page_size,
    )
    .context("Invalid Mailchimp API URL")?;
    debug!("Mailchimp API root: {}", client.base_url());

    if args.dry_run {
        println!("{}", "Dry run: no changes will be sent".yellow());
        let gateway = DryRunGateway::new(client);
        let result = run_sync(&gateway, &config, &rows, args.start_row).await;
        print_planned_writes(&gateway.writes());
        result.map(|_| ())
    } else {
        run_sync(&client, &config, &rows, args.start_row)
            .await
            .map(|_| ())
    }
}

/// Load the directory, sync every row and print the summary
pub async fn run_sync(
    gateway: &dyn Gateway,
    config: &Config,
    rows: &[RosterRow],
    start_row: usize,
) -> Result<SyncReport> {
    let directory = match Directory::load(
        gateway,
        &config.list_name,
        &config.interest_categories,
        &config.rank_category,
    )
    .await
    {
        Ok(directory) => directory,
        Err(e) if e.is_setup_error() => {
            return Err(anyhow::Error::new(e)
                .context("Check list_name and interest_categories in the config"));
        }
        Err(e) => return Err(e).context("Failed to load list directory"),
    };
    println!(
        "Syncing into '{}' ({})",
        directory.list_name(),
        directory.list_id()
    );

    let start = Instant::now();

    match sync_roster(gateway, &directory, rows, start_row).await {
        Ok(report) => {
            println!();
            println!("{}", report.to_string().green());
            println!(
                "{}",
                format!(
                    "Done in {:.1}s, {} row(s) changed",
                    start.elapsed().as_secs_f64(),
                    report.changed()
                )
                .green()
            );
            Ok(report)
        }
        Err(err) => {
            if let Some(failure) = err.downcast_ref::<RowFailure>() {
                println!();
                println!("{}", "Completed before the failure:".yellow());
                println!("{}", failure.report);
            }
            Err(err)
        }
    }
}

fn print_planned_writes(writes: &[Operation]) {
    if writes.is_empty() {
        println!("{}", "Dry run: nothing to change".green());
        return;
    }

    println!();
    println!(
        "{}",
        format!("Dry run: {} write(s) would be sent", writes.len()).yellow()
    );
    for op in writes {
        println!("  {}", op.to_string().dimmed());
    }
}
