//! Destination table lifecycle
//!
//! Decides what to do with the destination table before any record is
//! written, and drives the delete and create transitions to completion:
//!
//! ```text
//! Absent --create--> Transitioning --poll--> Active
//! Active --delete--> Transitioning --poll--> Absent
//! ```

use super::state::{Sleeper, TableState, WaitPolicy};
use crate::adapters::database::traits::TableStore;
use crate::core::schema::TableDefinition;
use crate::domain::{Result, TableError, TableName};
use std::sync::Arc;

/// Flags controlling what may happen to the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecyclePolicy {
    /// Create the table when it does not exist
    pub create_table: bool,
    /// Delete and recreate the table when it exists
    pub overwrite_existing: bool,
}

impl From<&crate::config::TargetConfig> for LifecyclePolicy {
    fn from(config: &crate::config::TargetConfig) -> Self {
        Self {
            create_table: config.create_table,
            overwrite_existing: config.overwrite_existing,
        }
    }
}

/// What the lifecycle will do to the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    /// Table is absent and will be created
    Create,
    /// Table exists and will be deleted, then created
    Recreate,
}

impl std::fmt::Display for TableAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableAction::Create => write!(f, "create"),
            TableAction::Recreate => write!(f, "delete and recreate"),
        }
    }
}

/// Applies the lifecycle policy to an observed table
///
/// Every outcome that writes records ends with a freshly created table, so
/// an existing table with `overwrite_existing` but without `create_table`
/// is refused up front rather than deleted and left missing.
///
/// # Errors
///
/// Returns `TableError::ExistsNoOverwrite` or `TableError::MissingNoCreate`.
pub fn plan_action(table: &TableName, exists: bool, policy: LifecyclePolicy) -> Result<TableAction> {
    match (exists, policy.overwrite_existing, policy.create_table) {
        (false, _, false) => Err(TableError::MissingNoCreate(table.to_string()).into()),
        (false, _, true) => Ok(TableAction::Create),
        (true, false, _) => Err(TableError::ExistsNoOverwrite(table.to_string()).into()),
        (true, true, false) => Err(TableError::MissingNoCreate(table.to_string()).into()),
        (true, true, true) => Ok(TableAction::Recreate),
    }
}

/// Table lifecycle manager
pub struct TableLifecycleManager {
    store: Arc<dyn TableStore + Send + Sync>,
    sleeper: Arc<dyn Sleeper>,
    wait: WaitPolicy,
}

impl TableLifecycleManager {
    /// Create a new lifecycle manager
    pub fn new(
        store: Arc<dyn TableStore + Send + Sync>,
        sleeper: Arc<dyn Sleeper>,
        wait: WaitPolicy,
    ) -> Self {
        Self {
            store,
            sleeper,
            wait,
        }
    }

    /// Observes the table, waiting out any in-flight transition
    ///
    /// A table left Transitioning by another run is polled until it is
    /// Absent or Active, so the returned state is always terminal.
    ///
    /// # Errors
    ///
    /// Returns `TableError::LifecycleQueryFailed` if the table cannot be
    /// described or does not settle within the polling budget.
    pub async fn observe(&self, table: &TableName) -> Result<TableState> {
        let state = self.store.table_state(table).await?;
        if state.is_terminal() {
            return Ok(state);
        }

        tracing::info!(table = %table, "Table is transitioning, waiting for it to settle");
        match self.poll_until(table, TableState::is_terminal).await? {
            Some(settled) => Ok(settled),
            None => Err(TableError::LifecycleQueryFailed {
                table: table.to_string(),
                message: format!(
                    "still transitioning after {} polling attempts",
                    self.wait.max_attempts
                ),
            }
            .into()),
        }
    }

    /// Whether the table exists
    pub async fn exists(&self, table: &TableName) -> Result<bool> {
        Ok(self.observe(table).await?.exists())
    }

    /// Observes the table and applies the policy without changing anything
    pub async fn plan(&self, table: &TableName, policy: LifecyclePolicy) -> Result<TableAction> {
        let exists = self.exists(table).await?;
        tracing::info!(
            table = %table,
            exists,
            create_table = policy.create_table,
            overwrite_existing = policy.overwrite_existing,
            "Evaluating table policy"
        );
        plan_action(table, exists, policy)
    }

    /// Plans and then carries out the table action
    ///
    /// On return the destination table is Active and empty.
    pub async fn prepare(
        &self,
        definition: &TableDefinition,
        policy: LifecyclePolicy,
    ) -> Result<TableAction> {
        let table = &definition.table_name;
        let action = self.plan(table, policy).await?;

        if action == TableAction::Recreate {
            self.delete_and_await_gone(table).await?;
        }
        self.create_and_await_active(definition).await?;

        Ok(action)
    }

    /// Deletes the table and polls until the store reports it absent
    ///
    /// # Errors
    ///
    /// Returns `TableError::DeleteFailed` if the request is rejected and
    /// `TableError::DeleteTimeout` if the table outlives the polling budget.
    pub async fn delete_and_await_gone(&self, table: &TableName) -> Result<()> {
        tracing::info!(table = %table, "Deleting existing table");
        self.store.delete_table(table).await?;

        let gone = self
            .poll_until(table, |state| state == TableState::Absent)
            .await?;
        if gone.is_none() {
            return Err(TableError::DeleteTimeout {
                table: table.to_string(),
                attempts: self.wait.max_attempts,
            }
            .into());
        }

        tracing::info!(table = %table, "Table deleted");
        Ok(())
    }

    /// Creates the table and polls until the store reports it active
    ///
    /// An Absent answer while polling is read as "still creating".
    ///
    /// # Errors
    ///
    /// Returns `TableError::CreateFailed` if the request is rejected and
    /// `TableError::CreateTimeout` if the table is not active within the
    /// polling budget.
    pub async fn create_and_await_active(&self, definition: &TableDefinition) -> Result<()> {
        let table = &definition.table_name;
        tracing::info!(
            table = %table,
            billing_mode = ?definition.billing_mode,
            global_indexes = definition.global_secondary_indexes.len(),
            local_indexes = definition.local_secondary_indexes.len(),
            stream = definition.stream_specification.is_some(),
            "Creating table"
        );
        self.store.create_table(definition).await?;

        let active = self
            .poll_until(table, |state| state == TableState::Active)
            .await?;
        if active.is_none() {
            return Err(TableError::CreateTimeout {
                table: table.to_string(),
                attempts: self.wait.max_attempts,
            }
            .into());
        }

        tracing::info!(table = %table, "Table is active");
        Ok(())
    }

    /// Sleeps then checks, up to the attempt budget; `None` when exhausted
    async fn poll_until<F>(&self, table: &TableName, done: F) -> Result<Option<TableState>>
    where
        F: Fn(TableState) -> bool + Send,
    {
        for attempt in 1..=self.wait.max_attempts {
            self.sleeper.sleep(self.wait.poll_interval).await;
            let state = self.store.table_state(table).await?;
            tracing::debug!(
                table = %table,
                attempt,
                max_attempts = self.wait.max_attempts,
                state = %state,
                "Polled table state"
            );
            if done(state) {
                return Ok(Some(state));
            }
        }
        Ok(None)
    }
}
