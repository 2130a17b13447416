//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels
//! - Local JSON file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use harbor::logging::init_logging;
//! use harbor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(table = "Users", "Import started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use harbor::log_error_with_context;
/// use harbor::domain::HarborError;
///
/// let error = HarborError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log the final import counts
///
/// # Example
///
/// ```no_run
/// use harbor::log_import_outcome;
///
/// log_import_outcome!("Users", 52, 1);
/// ```
#[macro_export]
macro_rules! log_import_outcome {
    ($table:expr, $imported:expr, $failed:expr) => {
        tracing::info!(
            table = %$table,
            imported = $imported,
            failed = $failed,
            "Import outcome"
        );
    };
}
