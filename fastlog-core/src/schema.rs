//! Idempotent provisioning of the fast_logger keyspace and table
//!
//! Both operations delegate entirely to the backend's create-if-absent DDL,
//! so they are safe to run on every startup and carry no partial-state
//! concerns of their own.

use crate::{executor::QueryExecutor, statements, Result};
use tracing::info;

/// Create the keyspace if it does not exist yet
///
/// Fixed single-replica SimpleStrategy; multi-node durability is out of
/// scope.
pub async fn ensure_keyspace<E: QueryExecutor + ?Sized>(executor: &E) -> Result<()> {
    executor.query(statements::CREATE_KEYSPACE, &[]).await?;
    info!(keyspace = statements::KEYSPACE, "keyspace ensured");
    Ok(())
}

/// Create the temperature table if it does not exist yet
///
/// Partition key = device, clustering key = time ascending; this layout is
/// what keeps range reads bounded by window size.
pub async fn ensure_measurement_table<E: QueryExecutor + ?Sized>(executor: &E) -> Result<()> {
    executor.query(statements::CREATE_TABLE, &[]).await?;
    info!(table = statements::TABLE, "measurement table ensured");
    Ok(())
}
