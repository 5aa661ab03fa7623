//! Query executor abstraction
//!
//! The capability seam between the data-access layer and whatever session
//! actually reaches the column store. The repository and schema manager
//! depend only on these traits, so a networked session, a pooled session
//! and the in-memory backend in [`memory`] are interchangeable, and unit
//! tests run with no network at all.
//!
//! Capabilities are split so a caller can require only what it uses: the
//! direct write and read paths need [`QueryExecutor`], the prepared write
//! path needs [`PreparedExecutor`].

pub mod memory;

pub use memory::MemoryExecutor;

use crate::{QueryOutput, Result, Value};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Ad hoc statement execution
///
/// Operations may suspend for a network round trip. No timeout parameter is
/// exposed; callers impose their own cancellation.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute statement text with positional parameters
    async fn query(&self, statement: &str, params: &[Value]) -> Result<QueryOutput>;
}

/// Prepared statement execution
#[async_trait]
pub trait PreparedExecutor: Send + Sync {
    /// Compile and cache a statement backend-side, returning an opaque handle
    ///
    /// Fails with [`Error::Prepare`](crate::Error::Prepare) on invalid text
    /// or an unreachable backend.
    async fn prepare(&self, statement: &str) -> Result<PreparedStatement>;

    /// Execute a previously prepared handle with new parameter values
    ///
    /// Only the parameters travel to the backend. Fails with
    /// [`Error::StaleHandle`](crate::Error::StaleHandle) when the backend no
    /// longer knows the handle (cache eviction, reconnection).
    async fn execute_prepared(
        &self,
        handle: &PreparedStatement,
        params: &[Value],
    ) -> Result<QueryOutput>;
}

/// Opaque handle to a statement compiled and cached backend-side
///
/// Bound to exactly one statement template. Cheap to clone and safe to share
/// read-only across concurrent callers. Once marked invalidated it is
/// terminal: every further use fails fast with
/// [`Error::StaleHandle`](crate::Error::StaleHandle) and the owner must
/// prepare a fresh handle.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    id: Uuid,
    statement: Arc<str>,
    invalidated: Arc<AtomicBool>,
}

impl PreparedStatement {
    /// Create a freshly prepared handle; called by executor implementations
    pub fn new(statement: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            statement: Arc::from(statement),
            invalidated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Backend-assigned handle identity
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The statement template this handle was prepared from
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Whether the handle has been marked invalidated
    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire)
    }

    /// Mark the handle invalidated; all clones observe it
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements;

    #[test]
    fn test_handles_are_distinct() {
        let a = PreparedStatement::new(statements::INSERT);
        let b = PreparedStatement::new(statements::INSERT);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.statement(), b.statement());
    }

    #[test]
    fn test_invalidation_is_shared_across_clones() {
        let handle = PreparedStatement::new(statements::INSERT);
        let clone = handle.clone();
        assert!(!clone.is_invalidated());

        handle.invalidate();
        assert!(clone.is_invalidated());
    }
}
