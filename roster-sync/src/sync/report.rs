//! Per-run tallies

use std::fmt;

/// What happened to a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Below `--start-row`
    SkippedByResume,
    SkippedNoEmail,
    SkippedInvalidEmail,
    /// Resolved and reconciled
    Synced {
        created: bool,
        unit_added: bool,
        rank_added: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows_seen: usize,
    pub skipped_by_resume: usize,
    pub skipped_no_email: usize,
    pub skipped_invalid_email: usize,
    pub created: usize,
    pub units_added: usize,
    pub ranks_added: usize,
    pub unchanged: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: RowOutcome) {
        self.rows_seen += 1;
        match outcome {
            RowOutcome::SkippedByResume => self.skipped_by_resume += 1,
            RowOutcome::SkippedNoEmail => self.skipped_no_email += 1,
            RowOutcome::SkippedInvalidEmail => self.skipped_invalid_email += 1,
            RowOutcome::Synced {
                created,
                unit_added,
                rank_added,
            } => {
                self.created += usize::from(created);
                self.units_added += usize::from(unit_added);
                self.ranks_added += usize::from(rank_added);
                if !created && !unit_added && !rank_added {
                    self.unchanged += 1;
                }
            }
        }
    }

    /// Rows that produced at least one write
    pub fn changed(&self) -> usize {
        self.rows_seen
            - self.skipped_by_resume
            - self.skipped_no_email
            - self.skipped_invalid_email
            - self.unchanged
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows processed:        {}", self.rows_seen)?;
        if self.skipped_by_resume > 0 {
            writeln!(f, "Skipped (before start): {}", self.skipped_by_resume)?;
        }
        writeln!(f, "Skipped (no email):    {}", self.skipped_no_email)?;
        writeln!(f, "Skipped (bad email):   {}", self.skipped_invalid_email)?;
        writeln!(f, "Subscribers created:   {}", self.created)?;
        writeln!(f, "Units added:           {}", self.units_added)?;
        writeln!(f, "Ranks added:           {}", self.ranks_added)?;
        write!(f, "Already in sync:       {}", self.unchanged)
    }
}
