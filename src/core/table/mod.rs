//! Destination table lifecycle
//!
//! Observes the destination table, decides between creating and recreating
//! it, and waits for each transition to finish before records are written.

pub mod lifecycle;
pub mod state;

pub use lifecycle::{plan_action, LifecyclePolicy, TableAction, TableLifecycleManager};
pub use state::{Sleeper, TableState, TokioSleeper, WaitPolicy};
