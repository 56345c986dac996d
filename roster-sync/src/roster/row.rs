//! Typed roster row

use crate::sync::SyncError;

/// Column headers as they appear in the district roster export
pub mod columns {
    pub const EMAIL: &str = "Registrant Home E-Mail";
    pub const UNIT_TYPE: &str = "Unit Type";
    pub const UNIT_NUMBER: &str = "Unit No";
    pub const FIRST_NAME: &str = "First Name";
    pub const LAST_NAME: &str = "Last Name";
    pub const RANK: &str = "Unit Rank";

    /// Headers that must be present for the sheet to be usable
    pub const REQUIRED: &[&str] = &[EMAIL, UNIT_TYPE, UNIT_NUMBER, RANK];
}

/// One adult on the roster. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRow {
    /// 1-based row number in the worksheet
    pub row: usize,
    pub email: Option<String>,
    pub unit_type: Option<String>,
    pub unit_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub rank: Option<String>,
}

impl RosterRow {
    #[cfg(test)]
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn unit_type(&self) -> Result<&str, SyncError> {
        self.require(&self.unit_type, columns::UNIT_TYPE)
    }

    pub fn unit_number(&self) -> Result<&str, SyncError> {
        self.require(&self.unit_number, columns::UNIT_NUMBER)
    }

    pub fn rank(&self) -> Result<&str, SyncError> {
        self.require(&self.rank, columns::RANK)
    }

    fn require<'a>(
        &self,
        value: &'a Option<String>,
        column: &'static str,
    ) -> Result<&'a str, SyncError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(SyncError::MissingField {
                row: self.row,
                column,
            })
    }
}
