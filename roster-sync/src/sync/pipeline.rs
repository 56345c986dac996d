//! Sequential row driver
//!
//! One row is resolved and reconciled completely before the next starts, so
//! at most one request is ever in flight. The first failing row ends the run.

use anyhow::Result;
use colored::*;
use log::debug;

use super::directory::Directory;
use super::email::{is_valid_email, normalize_email};
use super::error::SyncError;
use super::reconciler::{ChangeOutcome, Reconciler};
use super::report::{RowOutcome, SyncReport};
use super::resolver::SubscriberResolver;
use crate::api::Gateway;
use crate::roster::RosterRow;

/// Error that stopped a run, with where to resume
#[derive(Debug, thiserror::Error)]
#[error("Row {row} ({email})")]
pub struct RowFailure {
    pub row: usize,
    pub email: String,
    #[source]
    pub source: SyncError,
    /// Tallies for the rows completed before the failure
    pub report: SyncReport,
}

pub struct SyncPipeline<'a> {
    resolver: SubscriberResolver<'a>,
    reconciler: Reconciler<'a>,
    start_row: usize,
}

impl<'a> SyncPipeline<'a> {
    pub fn new(gateway: &'a dyn Gateway, directory: &'a Directory) -> Self {
        Self {
            resolver: SubscriberResolver::new(gateway, directory),
            reconciler: Reconciler::new(gateway, directory),
            start_row: 0,
        }
    }

    /// Skip worksheet rows numbered below `row`
    pub fn with_start_row(mut self, row: usize) -> Self {
        self.start_row = row;
        self
    }

    /// Sync every row in order, stopping at the first error
    pub async fn run(&self, rows: &[RosterRow]) -> Result<SyncReport, RowFailure> {
        let mut report = SyncReport::default();

        for row in rows {
            match self.sync_row(row).await {
                Ok(outcome) => report.record(outcome),
                Err(source) => {
                    return Err(RowFailure {
                        row: row.row,
                        email: row.email.clone().unwrap_or_default(),
                        source,
                        report,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Resolve then reconcile a single row
    pub async fn sync_row(&self, row: &RosterRow) -> Result<RowOutcome, SyncError> {
        if row.row < self.start_row {
            return Ok(RowOutcome::SkippedByResume);
        }

        let Some(email) = row.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            debug!("Row {}: no email address", row.row);
            return Ok(RowOutcome::SkippedNoEmail);
        };

        println!("{}", format!("{}: {}", row.full_name(), email).blue());

        if !is_valid_email(&normalize_email(email)) {
            println!(
                "{}",
                format!("Skipping {}: invalid email address '{}'", row.full_name(), email)
                    .yellow()
            );
            return Ok(RowOutcome::SkippedInvalidEmail);
        }

        let unit_type = row.unit_type()?;
        let unit_number = row.unit_number()?;
        let rank = row.rank()?;

        // Only a malformed address resolves to nothing, and that was ruled out above
        let Some(resolution) = self
            .resolver
            .resolve(email, &row.first_name, &row.last_name)
            .await?
        else {
            return Ok(RowOutcome::SkippedInvalidEmail);
        };

        let created = resolution.was_created();
        let mut subscriber = resolution.into_subscriber();

        let unit = self
            .reconciler
            .apply_unit(&mut subscriber, unit_type, unit_number)
            .await?;
        let rank = self.reconciler.apply_rank(&mut subscriber, rank).await?;

        Ok(RowOutcome::Synced {
            created,
            unit_added: unit == ChangeOutcome::Added,
            rank_added: rank == ChangeOutcome::Added,
        })
    }
}

/// Run the pipeline, attaching the resume hint to a failure.
///
/// The [`RowFailure`] stays reachable through `downcast_ref` so callers can
/// still print the partial report.
pub async fn sync_roster(
    gateway: &dyn Gateway,
    directory: &Directory,
    rows: &[RosterRow],
    start_row: usize,
) -> Result<SyncReport> {
    SyncPipeline::new(gateway, directory)
        .with_start_row(start_row)
        .run(rows)
        .await
        .map_err(|failure| {
            let hint = format!("Sync stopped; rerun with --start-row {}", failure.row);
            anyhow::Error::new(failure).context(hint)
        })
}
