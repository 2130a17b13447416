//! Domain identifier types with validation
//!
//! Newtype wrappers for DynamoDB identifiers. Each type ensures the value
//! satisfies the store's naming rules before it reaches an AWS call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 255;

fn validate_name(kind: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }
    if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        return Err(format!(
            "{kind} '{name}' must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(format!(
            "{kind} '{name}' contains invalid character '{c}' (allowed: a-z, A-Z, 0-9, '_', '-', '.')"
        ));
    }
    Ok(())
}

/// DynamoDB table name newtype wrapper
///
/// # Examples
///
/// ```
/// use harbor::domain::ids::TableName;
/// use std::str::FromStr;
///
/// let table = TableName::from_str("Users").unwrap();
/// assert_eq!(table.as_str(), "Users");
/// assert!(TableName::new("a b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a new TableName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(TableName)` if the name satisfies DynamoDB naming rules, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        validate_name("Table name", &name)?;
        Ok(Self(name))
    }

    /// Returns the table name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Secondary index name newtype wrapper
///
/// Index names follow the same character rules as table names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexName(String);

impl IndexName {
    /// Creates a new IndexName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        validate_name("Index name", &name)?;
        Ok(Self(name))
    }

    /// Returns the index name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for IndexName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IndexName> for String {
    fn from(value: IndexName) -> Self {
        value.0
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
