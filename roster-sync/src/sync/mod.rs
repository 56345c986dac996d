//! Roster-to-list synchronization
//!
//! [`Directory`] is loaded once per run; [`pipeline::SyncPipeline`] then walks the
//! roster row by row, resolving each adult to a subscriber and reconciling
//! unit membership and rank with the fewest possible writes.

pub mod directory;
pub mod email;
pub mod error;
pub mod pipeline;
pub mod reconciler;
pub mod report;
pub mod resolver;
pub mod units;

pub use directory::Directory;
pub use error::SyncError;
pub use pipeline::{RowFailure, sync_roster};
pub use report::SyncReport;
