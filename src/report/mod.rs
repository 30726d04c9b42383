//! Snapshot sinks: where the sampler hands its periodic estimates.
//!
//! The sampler calls [`SnapshotSink::write_snapshot`] after each scheduled
//! snapshot sweep and once more after the last sweep. A sink error aborts
//! the run.

mod csv;

pub use csv::{CsvReportWriter, DEFAULT_TOP_WORDS};

use crate::error::Result;
use crate::topic::{Estimates, PriorFields, Snapshot};

/// Receiver of sampler snapshots.
pub trait SnapshotSink {
    /// Consumes the snapshot taken after sweep `iteration`.
    ///
    /// # Errors
    ///
    /// Implementations return I/O or formatting failures.
    fn write_snapshot(&mut self, iteration: usize, snapshot: &Snapshot<'_>) -> Result<()>;
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn write_snapshot(&mut self, _iteration: usize, _snapshot: &Snapshot<'_>) -> Result<()> {
        Ok(())
    }
}

/// Owned copy of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSnapshot {
    pub iteration: usize,
    pub estimates: Estimates,
    pub prior: PriorFields,
}

/// Keeps every snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Vec<RecordedSnapshot>,
}

impl MemorySink {
    #[must_use]
    pub fn snapshots(&self) -> &[RecordedSnapshot] {
        &self.snapshots
    }

    /// Iterations at which snapshots arrived, in order.
    #[must_use]
    pub fn iterations(&self) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.iteration).collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<&RecordedSnapshot> {
        self.snapshots.last()
    }
}

impl SnapshotSink for MemorySink {
    fn write_snapshot(&mut self, iteration: usize, snapshot: &Snapshot<'_>) -> Result<()> {
        self.snapshots.push(RecordedSnapshot {
            iteration,
            estimates: snapshot.estimates.clone(),
            prior: snapshot.prior.clone(),
        });
        Ok(())
    }
}
