//! Statement texts for the fast_logger keyspace
//!
//! Fixed at compile time and shared by the schema manager, the repository
//! and any backend that matches on statement text. Positional placeholders
//! are always bound in (device, time, temperature) order.

/// Logical namespace holding the temperature table
pub const KEYSPACE: &str = "fast_logger";

/// Fully qualified table name
pub const TABLE: &str = "fast_logger.temperature";

/// Create-if-absent keyspace with single-replica durability
///
/// SimpleStrategy with one replica is adequate only for a single-node
/// deployment.
pub const CREATE_KEYSPACE: &str = "CREATE KEYSPACE IF NOT EXISTS fast_logger \
     WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 1} \
     AND durable_writes = true;";

/// Create-if-absent table: partition key = device, clustering key = time ASC
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS fast_logger.temperature (\
     device uuid, time timestamp, temperature smallint, \
     PRIMARY KEY (device, time)) \
     WITH CLUSTERING ORDER BY (time ASC);";

/// Parameterized insert, shared by the direct and prepared write paths
pub const INSERT: &str =
    "INSERT INTO fast_logger.temperature (device, time, temperature) VALUES (?, ?, ?);";

/// Bounded range read for one device; both time bounds are exclusive
pub const SELECT_RANGE: &str =
    "SELECT * FROM fast_logger.temperature WHERE device = ? AND time > ? AND time < ?;";
