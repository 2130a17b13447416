//! Batched record import
//!
//! Records are written one `PutItem` at a time in consecutive groups of at
//! most `batch_size`. A failed write is classified and recorded, and the
//! import moves on to the next record.

use crate::adapters::database::traits::TableStore;
use crate::config::ImportConfig;
use crate::core::table::Sleeper;
use crate::domain::{Record, RecordFailureKind, TableName};
use futures::stream::{self, StreamExt};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for batch processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Records per group (1-25)
    pub batch_size: usize,
    /// Pause between consecutive groups
    pub batch_delay: Duration,
    /// Writes in flight at once within a group
    pub write_concurrency: usize,
}

impl BatchConfig {
    /// Create a new batch configuration
    pub fn new(batch_size: usize, batch_delay: Duration, write_concurrency: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
            write_concurrency: write_concurrency.max(1),
        }
    }

    /// Create from the `[import]` configuration section
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(
            config.batch_size,
            config.batch_delay(),
            config.write_concurrency,
        )
    }
}

/// A record the store refused
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// Position of the record in the export
    pub index: usize,
    /// The record as it appeared in the export
    pub record: Record,
    /// Failure classification
    pub kind: RecordFailureKind,
    /// Message reported by the store
    pub reason: String,
}

/// Outcome of importing a sequence of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    /// Records written
    pub success_count: usize,
    /// Records refused
    pub failed_count: usize,
    /// One entry per refused record, in source order
    pub failures: Vec<RecordFailure>,
}

impl ImportResult {
    /// Create a new empty import result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successful write
    pub fn add_success(&mut self) {
        self.success_count += 1;
    }

    /// Add a failed write
    pub fn add_failure(&mut self, failure: RecordFailure) {
        self.failed_count += 1;
        self.failures.push(failure);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ImportResult) {
        self.success_count += other.success_count;
        self.failed_count += other.failed_count;
        self.failures.extend(other.failures);
    }

    /// Records attempted
    pub fn total(&self) -> usize {
        self.success_count + self.failed_count
    }

    /// Failure counts per classification
    pub fn failures_by_kind(&self) -> Vec<(RecordFailureKind, usize)> {
        let mut counts: Vec<(RecordFailureKind, usize)> = Vec::new();
        for failure in &self.failures {
            match counts.iter_mut().find(|(kind, _)| *kind == failure.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((failure.kind, 1)),
            }
        }
        counts
    }
}

/// Splits `len` records into consecutive group ranges of at most `batch_size`
pub fn group_ranges(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

/// Writes records to a destination table in paced groups
pub struct BatchImporter {
    store: Arc<dyn TableStore + Send + Sync>,
    sleeper: Arc<dyn Sleeper>,
    config: BatchConfig,
}

impl BatchImporter {
    /// Create a new batch importer
    pub fn new(
        store: Arc<dyn TableStore + Send + Sync>,
        sleeper: Arc<dyn Sleeper>,
        config: BatchConfig,
    ) -> Self {
        Self {
            store,
            sleeper,
            config,
        }
    }

    /// Imports `records` into `table`
    ///
    /// Never fails: every write error is folded into the result, even when
    /// no record at all is accepted.
    pub async fn import(&self, table: &TableName, records: &[Record]) -> ImportResult {
        let groups = group_ranges(records.len(), self.config.batch_size);
        let group_count = groups.len();
        let mut result = ImportResult::new();

        tracing::info!(
            table = %table,
            records = records.len(),
            groups = group_count,
            batch_size = self.config.batch_size,
            write_concurrency = self.config.write_concurrency,
            "Importing records"
        );

        for (group_index, range) in groups.into_iter().enumerate() {
            let group = self.import_group(table, records, range).await;
            result.merge(group);

            tracing::info!(
                table = %table,
                group = group_index + 1,
                groups = group_count,
                processed = result.total(),
                total = records.len(),
                succeeded = result.success_count,
                failed = result.failed_count,
                "Import progress"
            );

            if group_index + 1 < group_count && !self.config.batch_delay.is_zero() {
                self.sleeper.sleep(self.config.batch_delay).await;
            }
        }

        result
    }

    async fn import_group(
        &self,
        table: &TableName,
        records: &[Record],
        range: Range<usize>,
    ) -> ImportResult {
        let offset = range.start;
        let outcomes: Vec<_> = stream::iter(records[range].iter().enumerate())
            .map(|(position, record)| async move {
                let outcome = self.store.put_record(table, record).await;
                (offset + position, record, outcome)
            })
            .buffered(self.config.write_concurrency)
            .collect()
            .await;

        let mut result = ImportResult::new();
        for (index, record, outcome) in outcomes {
            match outcome {
                Ok(()) => result.add_success(),
                Err(e) => {
                    tracing::warn!(
                        table = %table,
                        index,
                        kind = %e.kind,
                        error = %e.message,
                        "Failed to write record"
                    );
                    result.add_failure(RecordFailure {
                        index,
                        record: record.clone(),
                        kind: e.kind,
                        reason: e.message,
                    });
                }
            }
        }
        result
    }
}
