//! Import orchestration and batch processing
//!
//! This module provides the restore logic for Harbor, including:
//! - Paced, failure-isolating record import
//! - Import coordination
//! - Summary and response reporting

pub mod batch;
pub mod coordinator;
pub mod summary;

pub use batch::{group_ranges, BatchConfig, BatchImporter, ImportResult, RecordFailure};
pub use coordinator::ImportCoordinator;
pub use summary::{ImportBody, ImportReport, ImportResponse, ReportedFailure, ResponseBody};
