//! fastlog core - data-access layer for a temperature logging service
//!
//! Accepts device-originated temperature measurements, persists them into a
//! partitioned, clustered column store and serves range queries by device
//! and time window.
//!
//! # Architecture
//!
//! - **Measurement model**: the immutable reading plus its serialization
//!   contract to and from storage parameters
//! - **Query executor abstraction**: the capability traits any session-like
//!   object satisfies; the repository never sees a concrete transport
//! - **Schema manager**: idempotent provisioning of the `fast_logger`
//!   keyspace and its temperature table (partition key = device, clustering
//!   key = time ascending)
//! - **Measurement repository**: direct writes, prepared writes and bounded
//!   range reads over the abstraction
//!
//! The partition/clustering layout keeps a range read bounded by the size
//! of the requested window rather than by total table size.

pub mod executor;
pub mod repository;
pub mod schema;
pub mod statements;

mod error;
mod measurement;
mod types;

pub use error::{Error, Result};
pub use executor::{MemoryExecutor, PreparedExecutor, PreparedStatement, QueryExecutor};
pub use measurement::Measurement;
pub use types::{QueryOutput, Row, Value};

/// fastlog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
