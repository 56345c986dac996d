//! Roster spreadsheet ingestion

pub mod reader;
pub mod row;

pub use reader::read_roster;
pub use row::RosterRow;
