//! In-memory executor
//!
//! A process-local stand-in for the column store that honors the same
//! semantics the schema relies on: one partition per device, rows clustered
//! ascending by time, last-write-wins on a duplicate `(device, time)` pair,
//! exclusive range bounds. It backs unit tests with zero network dependency
//! and doubles as a session-provider variant for single-process use.

use super::{PreparedExecutor, PreparedStatement, QueryExecutor};
use crate::{statements, Error, QueryOutput, Result, Row, Value};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    keyspace_created: bool,
    table_created: bool,
    /// Partition key -> clustering-ordered rows
    partitions: HashMap<Uuid, BTreeMap<DateTime<Utc>, i16>>,
    /// Backend-side prepared statement cache
    prepared: HashSet<Uuid>,
    /// Next operation fails with this error instead of running
    fail_next: Option<Error>,
}

/// In-memory implementation of both executor capabilities
#[derive(Default)]
pub struct MemoryExecutor {
    inner: Mutex<Inner>,
}

impl MemoryExecutor {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next operation fail with `error`
    pub fn fail_next(&self, error: Error) {
        self.inner.lock().fail_next = Some(error);
    }

    /// Drop every cached prepared statement, as a backend restart would
    pub fn evict_prepared(&self) {
        let mut inner = self.inner.lock();
        let evicted = inner.prepared.len();
        inner.prepared.clear();
        debug!(evicted, "evicted prepared statement cache");
    }

    /// Whether the keyspace has been provisioned
    pub fn keyspace_exists(&self) -> bool {
        self.inner.lock().keyspace_created
    }

    /// Whether the temperature table has been provisioned
    pub fn table_exists(&self) -> bool {
        self.inner.lock().table_created
    }

    /// Stored row count for one device's partition
    pub fn partition_len(&self, device: Uuid) -> usize {
        self.inner
            .lock()
            .partitions
            .get(&device)
            .map_or(0, BTreeMap::len)
    }

    fn dispatch(&self, statement: &str, params: &[Value]) -> Result<QueryOutput> {
        let mut inner = self.inner.lock();

        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }

        match statement {
            statements::CREATE_KEYSPACE => {
                inner.keyspace_created = true;
                Ok(QueryOutput::empty())
            }
            statements::CREATE_TABLE => {
                inner.table_created = true;
                Ok(QueryOutput::empty())
            }
            statements::INSERT => inner.apply_insert(params),
            statements::SELECT_RANGE => inner.select_range(params),
            other => Err(Error::Execution(format!(
                "unknown statement: {other}"
            ))),
        }
    }
}

impl Inner {
    fn apply_insert(&mut self, params: &[Value]) -> Result<QueryOutput> {
        let (device, time, temperature) = match params {
            [Value::Uuid(d), Value::Timestamp(t), Value::SmallInt(v)] => (*d, *t, *v),
            _ => {
                return Err(Error::Execution(
                    "insert expects (uuid, timestamp, smallint)".to_string(),
                ))
            }
        };

        // BTreeMap insert is exactly the store's merge rule: clustering
        // order on the key, last write wins on a duplicate
        self.partitions
            .entry(device)
            .or_default()
            .insert(time, temperature);

        Ok(QueryOutput::empty())
    }

    fn select_range(&self, params: &[Value]) -> Result<QueryOutput> {
        let (device, from, to) = match params {
            [Value::Uuid(d), Value::Timestamp(f), Value::Timestamp(t)] => (*d, *f, *t),
            _ => {
                return Err(Error::Execution(
                    "range select expects (uuid, timestamp, timestamp)".to_string(),
                ))
            }
        };

        // Both bounds exclusive; an empty or inverted window is an empty
        // result, not an error
        if from >= to {
            return Ok(QueryOutput::empty());
        }

        let rows = self
            .partitions
            .get(&device)
            .map(|partition| {
                partition
                    .range((Bound::Excluded(from), Bound::Excluded(to)))
                    .map(|(time, temperature)| {
                        Row::new(vec![
                            ("device".to_string(), Value::Uuid(device)),
                            ("time".to_string(), Value::Timestamp(*time)),
                            ("temperature".to_string(), Value::SmallInt(*temperature)),
                        ])
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(QueryOutput::with_rows(rows))
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn query(&self, statement: &str, params: &[Value]) -> Result<QueryOutput> {
        self.dispatch(statement, params)
    }
}

#[async_trait]
impl PreparedExecutor for MemoryExecutor {
    async fn prepare(&self, statement: &str) -> Result<PreparedStatement> {
        let mut inner = self.inner.lock();

        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }

        match statement {
            statements::INSERT | statements::SELECT_RANGE => {
                let handle = PreparedStatement::new(statement);
                inner.prepared.insert(handle.id());
                debug!(id = %handle.id(), "prepared statement");
                Ok(handle)
            }
            other => Err(Error::Prepare(format!("unknown statement: {other}"))),
        }
    }

    async fn execute_prepared(
        &self,
        handle: &PreparedStatement,
        params: &[Value],
    ) -> Result<QueryOutput> {
        {
            let mut inner = self.inner.lock();
            if let Some(error) = inner.fail_next.take() {
                return Err(error);
            }
            if !inner.prepared.contains(&handle.id()) {
                return Err(Error::StaleHandle);
            }
        }

        self.dispatch(handle.statement(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn insert_params(device: Uuid, millis: i64, temperature: i16) -> [Value; 3] {
        [
            Value::Uuid(device),
            Value::Timestamp(at(millis)),
            Value::SmallInt(temperature),
        ]
    }

    #[tokio::test]
    async fn test_rows_come_back_clustered_ascending() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        // Out of clustering order on purpose
        for millis in [300, 100, 200] {
            executor
                .query(statements::INSERT, &insert_params(device, millis, 0))
                .await
                .unwrap();
        }

        let out = executor
            .query(
                statements::SELECT_RANGE,
                &[
                    Value::Uuid(device),
                    Value::Timestamp(at(0)),
                    Value::Timestamp(at(1_000)),
                ],
            )
            .await
            .unwrap();

        let times: Vec<_> = out
            .rows()
            .map(|row| row.get("time").unwrap().as_timestamp().unwrap())
            .collect();
        assert_eq!(times, vec![at(100), at(200), at(300)]);
    }

    #[tokio::test]
    async fn test_duplicate_pair_keeps_later_value() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        executor
            .query(statements::INSERT, &insert_params(device, 100, 20))
            .await
            .unwrap();
        executor
            .query(statements::INSERT, &insert_params(device, 100, 25))
            .await
            .unwrap();

        assert_eq!(executor.partition_len(device), 1);

        let out = executor
            .query(
                statements::SELECT_RANGE,
                &[
                    Value::Uuid(device),
                    Value::Timestamp(at(0)),
                    Value::Timestamp(at(1_000)),
                ],
            )
            .await
            .unwrap();
        let row = out.rows().next().unwrap().clone();
        assert_eq!(row.get("temperature"), Some(&Value::SmallInt(25)));
    }

    #[tokio::test]
    async fn test_bounds_are_exclusive() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        for millis in [100, 200, 300] {
            executor
                .query(statements::INSERT, &insert_params(device, millis, 0))
                .await
                .unwrap();
        }

        // Rows exactly at either bound stay out
        let out = executor
            .query(
                statements::SELECT_RANGE,
                &[
                    Value::Uuid(device),
                    Value::Timestamp(at(100)),
                    Value::Timestamp(at(300)),
                ],
            )
            .await
            .unwrap();
        assert_eq!(out.row_count(), 1);
        let row = out.rows().next().unwrap().clone();
        assert_eq!(row.get("time").unwrap().as_timestamp(), Some(at(200)));
    }

    #[tokio::test]
    async fn test_empty_window_is_not_an_error() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        executor
            .query(statements::INSERT, &insert_params(device, 100, 0))
            .await
            .unwrap();

        let out = executor
            .query(
                statements::SELECT_RANGE,
                &[
                    Value::Uuid(device),
                    Value::Timestamp(at(500)),
                    Value::Timestamp(at(500)),
                ],
            )
            .await
            .unwrap();
        assert_eq!(out.row_count(), 0);
    }

    #[tokio::test]
    async fn test_eviction_makes_handles_stale() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        let handle = executor.prepare(statements::INSERT).await.unwrap();
        executor
            .execute_prepared(&handle, &insert_params(device, 100, 20))
            .await
            .unwrap();

        executor.evict_prepared();

        let err = executor
            .execute_prepared(&handle, &insert_params(device, 200, 22))
            .await
            .unwrap_err();
        assert!(err.is_stale_handle());
    }

    #[tokio::test]
    async fn test_fail_next_only_fails_once() {
        let executor = MemoryExecutor::new();
        let device = Uuid::new_v4();

        executor.fail_next(Error::Execution("injected".to_string()));

        let err = executor
            .query(statements::INSERT, &insert_params(device, 100, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution(_)));

        executor
            .query(statements::INSERT, &insert_params(device, 100, 20))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_statement_is_rejected() {
        let executor = MemoryExecutor::new();
        let err = executor
            .query("DROP TABLE fast_logger.temperature;", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
    }
}
