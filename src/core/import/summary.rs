//! Import summary and response
//!
//! [`ImportReport`] is the completed-run summary; [`ImportResponse`] is the
//! `{statusCode, body}` object handed back to the caller.

use super::batch::{ImportResult, RecordFailure};
use crate::core::table::TableAction;
use crate::domain::{HarborError, Record, RecordFailureKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;

/// Summary of a completed import run
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Destination table
    pub table_name: String,

    /// Where the export file was read from
    pub source_file: String,

    /// When the run started
    pub import_date: DateTime<Utc>,

    /// Action taken (or planned, for a dry run) on the destination table
    pub table_action: TableAction,

    /// Records in the export
    pub total_records: usize,

    /// Per-record outcome
    pub result: ImportResult,

    /// No delete, create or put was issued
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl ImportReport {
    /// Records written (or that would be written, for a dry run)
    pub fn imported_items(&self) -> usize {
        self.result.success_count
    }

    /// Records refused
    pub fn failed_items(&self) -> usize {
        self.result.failed_count
    }

    /// Check if every record was written
    pub fn is_successful(&self) -> bool {
        self.result.failed_count == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        (self.result.success_count as f64 / self.total_records as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            table = %self.table_name,
            source = %self.source_file,
            table_action = %self.table_action,
            total_records = self.total_records,
            imported = self.imported_items(),
            failed = self.failed_items(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Import completed"
        );

        if !self.is_successful() {
            for (kind, count) in self.result.failures_by_kind() {
                tracing::warn!(
                    kind = %kind,
                    count,
                    retryable = kind.is_retryable(),
                    "Import completed with record failures"
                );
            }
        }
    }
}

/// One failed record as reported in the response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedFailure {
    pub index: usize,
    pub kind: RecordFailureKind,
    pub reason: String,
    pub record: Record,
}

impl From<&RecordFailure> for ReportedFailure {
    fn from(failure: &RecordFailure) -> Self {
        Self {
            index: failure.index,
            kind: failure.kind,
            reason: failure.reason.clone(),
            record: failure.record.clone(),
        }
    }
}

/// Body of a 200 response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
    pub table_name: String,
    pub imported_items: usize,
    pub failed_items: usize,
    pub source_file: String,
    pub import_date: String,
    pub failures: Vec<ReportedFailure>,
    /// Set when `failures` was cut short; the counts are always exact
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failures_truncated: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

/// Response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// The run completed, possibly with record failures
    Completed(ImportBody),
    /// The run aborted
    Failed { error: String },
}

/// `{statusCode, body}` result of one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl ImportResponse {
    /// 200 response for a completed run, listing at most `max_failures` failures
    pub fn completed(report: &ImportReport, max_failures: usize) -> Self {
        let failures: Vec<ReportedFailure> = report
            .result
            .failures
            .iter()
            .take(max_failures)
            .map(ReportedFailure::from)
            .collect();

        Self {
            status_code: 200,
            body: ResponseBody::Completed(ImportBody {
                table_name: report.table_name.clone(),
                imported_items: report.imported_items(),
                failed_items: report.failed_items(),
                source_file: report.source_file.clone(),
                import_date: report
                    .import_date
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                failures_truncated: failures.len() < report.result.failures.len(),
                failures,
                dry_run: report.dry_run,
            }),
        }
    }

    /// 500 response for a fatal error
    pub fn failed(error: &HarborError) -> Self {
        Self {
            status_code: 500,
            body: ResponseBody::Failed {
                error: error.to_string(),
            },
        }
    }

    /// Completed body, if any
    pub fn completed_body(&self) -> Option<&ImportBody> {
        match &self.body {
            ResponseBody::Completed(body) => Some(body),
            ResponseBody::Failed { .. } => None,
        }
    }
}
