//! Smoke-test harness for the portfolio page
//!
//! Split into two layers:
//! - acquisition (`SnapshotSource`): how a [`DomSnapshot`] is obtained
//! - assertion (`checks`): pure functions from snapshot to outcome

pub mod checks;
pub mod error;
pub mod record;
pub mod runner;
pub mod snapshot;

pub use checks::{Check, ESSENTIAL_SECTIONS, standard_checks};
pub use error::HarnessError;
pub use record::{Category, CheckOutcome, LogEntry, LogLevel, Tally, TestRecord, TestStatus};
pub use runner::{Harness, SnapshotSource, StaticSnapshotSource};
pub use snapshot::{DomSnapshot, ElementSnapshot, STYLE_PROPERTIES};
