//! In-memory adapters for unit tests

use crate::adapters::database::traits::TableStore;
use crate::adapters::storage::SnapshotSource;
use crate::core::schema::TableDefinition;
use crate::core::table::{Sleeper, TableState};
use crate::domain::{
    HarborError, Record, RecordFailureKind, RecordWriteError, Result, TableError, TableName,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A call made against [`MockTableStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Describe(String),
    Delete(String),
    Create(String),
    Put(String),
}

#[derive(Debug)]
struct TableEntry {
    state: TableState,
    /// Transitioning answers left before `target` is reached
    remaining: Option<(u32, TableState)>,
    /// Explicit answers that take priority over everything else
    script: VecDeque<TableState>,
}

impl TableEntry {
    fn new(state: TableState) -> Self {
        Self {
            state,
            remaining: None,
            script: VecDeque::new(),
        }
    }

    fn observe(&mut self) -> TableState {
        if let Some(state) = self.script.pop_front() {
            return state;
        }
        match self.remaining {
            Some((0, target)) => {
                self.state = target;
                self.remaining = None;
            }
            Some((n, target)) => {
                self.remaining = Some((n - 1, target));
                return TableState::Transitioning;
            }
            None => {}
        }
        self.state
    }
}

#[derive(Debug, Default)]
struct MockState {
    tables: HashMap<String, TableEntry>,
    calls: Vec<StoreCall>,
    written: HashMap<String, Vec<Record>>,
    created: Vec<TableDefinition>,
    put_failures: Vec<(String, Value, RecordFailureKind)>,
    describe_error: Option<String>,
    delete_error: Option<String>,
    create_error: Option<String>,
}

/// Scriptable in-memory [`TableStore`]
///
/// Creates and deletes take `transition_polls` Transitioning observations
/// before settling.
#[derive(Debug, Default)]
pub struct MockTableStore {
    state: Mutex<MockState>,
    transition_polls: u32,
}

impl MockTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of Transitioning observations after each create or delete
    pub fn with_transition_polls(mut self, polls: u32) -> Self {
        self.transition_polls = polls;
        self
    }

    /// Start with an existing table in `state`
    pub fn with_table(self, table: &str, state: TableState) -> Self {
        self.lock()
            .tables
            .insert(table.to_string(), TableEntry::new(state));
        self
    }

    /// Queue explicit describe answers for a table
    pub fn script_states(self, table: &str, states: Vec<TableState>) -> Self {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_insert_with(|| TableEntry::new(TableState::Absent))
            .script
            .extend(states);
        self
    }

    /// Fail every put whose `attribute` equals `value`
    pub fn fail_puts_where(self, attribute: &str, value: Value, kind: RecordFailureKind) -> Self {
        self.lock()
            .put_failures
            .push((attribute.to_string(), value, kind));
        self
    }

    pub fn fail_describe(self, message: &str) -> Self {
        self.lock().describe_error = Some(message.to_string());
        self
    }

    pub fn fail_delete(self, message: &str) -> Self {
        self.lock().delete_error = Some(message.to_string());
        self
    }

    pub fn fail_create(self, message: &str) -> Self {
        self.lock().create_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Calls other than Describe
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, StoreCall::Describe(_)))
            .collect()
    }

    pub fn put_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Put(_)))
            .count()
    }

    pub fn written(&self, table: &str) -> Vec<Record> {
        self.lock().written.get(table).cloned().unwrap_or_default()
    }

    pub fn created(&self) -> Vec<TableDefinition> {
        self.lock().created.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl TableStore for MockTableStore {
    async fn table_state(&self, table: &TableName) -> Result<TableState> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Describe(table.to_string()));
        if let Some(message) = &state.describe_error {
            return Err(TableError::LifecycleQueryFailed {
                table: table.to_string(),
                message: message.clone(),
            }
            .into());
        }
        Ok(state
            .tables
            .get_mut(table.as_str())
            .map(TableEntry::observe)
            .unwrap_or(TableState::Absent))
    }

    async fn delete_table(&self, table: &TableName) -> Result<()> {
        let polls = self.transition_polls;
        let mut state = self.lock();
        state.calls.push(StoreCall::Delete(table.to_string()));
        if let Some(message) = &state.delete_error {
            return Err(TableError::DeleteFailed {
                table: table.to_string(),
                message: message.clone(),
            }
            .into());
        }
        if let Some(entry) = state.tables.get_mut(table.as_str()) {
            entry.state = TableState::Transitioning;
            entry.remaining = Some((polls, TableState::Absent));
        }
        state.written.remove(table.as_str());
        Ok(())
    }

    async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let polls = self.transition_polls;
        let table = definition.table_name.to_string();
        let mut state = self.lock();
        state.calls.push(StoreCall::Create(table.clone()));
        if let Some(message) = &state.create_error {
            return Err(TableError::CreateFailed {
                table,
                message: message.clone(),
            }
            .into());
        }
        let entry = state
            .tables
            .entry(table)
            .or_insert_with(|| TableEntry::new(TableState::Absent));
        if entry.state.exists() && entry.remaining.is_none() {
            return Err(HarborError::Other("table already exists".to_string()));
        }
        entry.state = TableState::Transitioning;
        entry.remaining = Some((polls, TableState::Active));
        state.created.push(definition.clone());
        Ok(())
    }

    async fn put_record(
        &self,
        table: &TableName,
        record: &Record,
    ) -> std::result::Result<(), RecordWriteError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Put(table.to_string()));
        let failure = state
            .put_failures
            .iter()
            .find(|(attribute, value, _)| record.get(attribute) == Some(value))
            .map(|(attribute, _, kind)| (attribute.clone(), *kind));
        if let Some((attribute, kind)) = failure {
            return Err(RecordWriteError::new(
                kind,
                format!("rejected item by {attribute}"),
            ));
        }
        state
            .written
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn store_name(&self) -> &str {
        "mock"
    }
}

/// Sleeper that records requested delays and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Snapshot source serving fixed bytes
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource {
    bytes: Vec<u8>,
    location: String,
}

impl StaticSnapshotSource {
    pub fn new(bytes: impl Into<Vec<u8>>, location: &str) -> Self {
        Self {
            bytes: bytes.into(),
            location: location.to_string(),
        }
    }

    pub fn json(value: &Value, location: &str) -> Self {
        Self::new(value.to_string(), location)
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}
