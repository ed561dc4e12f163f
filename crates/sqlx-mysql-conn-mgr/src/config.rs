//! Configuration for MySQL database connection pools

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Configuration for the MysqlDatabase connection pool
///
/// # Examples
///
/// ```
/// use sqlx_mysql_conn_mgr::MysqlDatabaseConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = MysqlDatabaseConfig::default();
///
/// // Override just one field
/// let config = MysqlDatabaseConfig {
///     max_connections: 4,
///     ..Default::default()
/// };
///
/// assert_eq!(config.idle_timeout, Duration::from_secs(600));
/// ```
///
/// When deserialized, keys are camelCase, timeouts are whole seconds and
/// missing keys keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MysqlDatabaseConfig {
   /// Maximum number of pooled connections
   ///
   /// Every in-flight request holds one connection for the duration of its
   /// query, so this bounds how many catalog searches run concurrently.
   ///
   /// Default: 10
   pub max_connections: u32,

   /// Connections kept open even when idle
   ///
   /// Default: 0
   pub min_connections: u32,

   /// How long a caller waits for a free connection before failing
   ///
   /// Default: 30 seconds
   #[serde(deserialize_with = "seconds")]
   pub acquire_timeout: Duration,

   /// Idle timeout for pooled connections
   ///
   /// Connections that remain idle for this duration are closed.
   ///
   /// Default: 10 minutes
   #[serde(deserialize_with = "seconds")]
   pub idle_timeout: Duration,
}

impl Default for MysqlDatabaseConfig {
   fn default() -> Self {
      Self {
         max_connections: 10,
         min_connections: 0,
         acquire_timeout: Duration::from_secs(30),
         idle_timeout: Duration::from_secs(600),
      }
   }
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
   u64::deserialize(deserializer).map(Duration::from_secs)
}
