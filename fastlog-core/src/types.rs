//! Storage parameter and row types for fastlog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A typed value passed to or returned from the storage backend
///
/// Covers exactly the column types of the temperature table: the device
/// identifier, the clustering timestamp, and the reading itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 128-bit device identifier
    Uuid(Uuid),
    /// Point in time, microsecond or finer resolution
    Timestamp(DateTime<Utc>),
    /// 16-bit signed reading
    SmallInt(i16),
}

impl Value {
    /// Get as a device identifier if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as a timestamp if possible
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as a 16-bit reading if possible
    pub fn as_smallint(&self) -> Option<i16> {
        match self {
            Value::SmallInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Value::SmallInt(v) => write!(f, "{}", v),
        }
    }
}

/// One row returned by the backend, as named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create a row from named columns
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The outcome of an executed statement
///
/// Writes and DDL produce an empty row sequence; selects carry their rows
/// in storage order.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    rows: Vec<Row>,
}

impl QueryOutput {
    /// An output with no rows (writes, DDL)
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// An output carrying result rows
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Iterate the result rows; empty if the statement was a write
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Consume the output, yielding its rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Number of result rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
