//! Measurement repository
//!
//! The operations layer over the executor abstraction: direct writes,
//! prepared writes and bounded range reads. Nothing here touches a network
//! type; every call goes through [`QueryExecutor`] or [`PreparedExecutor`],
//! which is what keeps the layer testable against the in-memory backend.
//!
//! No retries live here. Backend failures surface to the caller in their
//! own category and retry/backoff policy stays with the caller.

use crate::{
    executor::{PreparedExecutor, PreparedStatement, QueryExecutor},
    statements, Error, Measurement, Result,
};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Write one measurement through an ad hoc parameterized insert
pub async fn insert<E: QueryExecutor + ?Sized>(
    executor: &E,
    measurement: &Measurement,
) -> Result<()> {
    executor
        .query(statements::INSERT, &measurement.to_params())
        .await
        .map_err(|e| Error::Write(e.to_string()))?;
    debug!(device = %measurement.device, "inserted measurement");
    Ok(())
}

/// Prepare the insert statement once, for reuse over the service lifetime
///
/// Concurrent redundant calls are wasteful but safe; de-duplication is the
/// caller's concern.
pub async fn prepare_insert<E: PreparedExecutor + ?Sized>(
    executor: &E,
) -> Result<PreparedStatement> {
    let handle = executor.prepare(statements::INSERT).await?;
    debug!(id = %handle.id(), "prepared insert statement");
    Ok(handle)
}

/// Write one measurement through a previously prepared handle
///
/// An invalidated handle fails fast without touching the backend. When the
/// backend itself reports the handle unknown, the handle is marked
/// invalidated so every clone fails fast from then on, and the caller gets
/// [`Error::StaleHandle`] to re-prepare on. No automatic re-prepare here.
pub async fn execute_insert<E: PreparedExecutor + ?Sized>(
    executor: &E,
    handle: &PreparedStatement,
    measurement: &Measurement,
) -> Result<()> {
    if handle.is_invalidated() {
        return Err(Error::StaleHandle);
    }

    match executor
        .execute_prepared(handle, &measurement.to_params())
        .await
    {
        Ok(_) => {
            debug!(device = %measurement.device, "inserted measurement via prepared statement");
            Ok(())
        }
        Err(Error::StaleHandle) => {
            handle.invalidate();
            Err(Error::StaleHandle)
        }
        Err(e) => Err(e),
    }
}

/// Read all measurements for one device with `from < time < to`
///
/// Both bounds are exclusive; callers needing inclusive bounds widen the
/// window by the smallest representable delta. Rows arrive in clustering
/// order, so the result is ascending by time with no client-side sort. A
/// row that fails to decode aborts the whole read; no partial result is
/// returned.
pub async fn select_range<E: QueryExecutor + ?Sized>(
    executor: &E,
    device: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Measurement>> {
    let output = executor
        .query(
            statements::SELECT_RANGE,
            &[device.into(), from.into(), to.into()],
        )
        .await
        .map_err(|e| Error::Read(e.to_string()))?;

    let measurements = output
        .rows()
        .map(Measurement::from_row)
        .collect::<Result<Vec<_>>>()?;

    debug!(device = %device, count = measurements.len(), "range read");
    Ok(measurements)
}
