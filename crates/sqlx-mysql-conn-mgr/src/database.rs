//! MySQL database with a shared connection pool

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use tracing::debug;

use crate::config::MysqlDatabaseConfig;
use crate::error::{Error, Result};

/// MySQL database backed by a single shared connection pool.
///
/// ## State Management
///
/// - **`pool`**: Connections shared by every caller holding the `Arc`
/// - **`closed`**: Prevents use after the database has been closed
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect (eagerly, or lazily without touching the network)
/// 2. Hand the Arc to whatever executes queries
/// 3. Close the database when done
/// ```
#[derive(Debug)]
pub struct MysqlDatabase {
   /// Connection pool used for every query
   pool: Pool<MySql>,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,
}

impl MysqlDatabase {
   /// Connect to a MySQL server, opening the first connection immediately.
   ///
   /// Fails if the URL is malformed or the server cannot be reached.
   pub async fn connect(url: &str, custom_config: Option<MysqlDatabaseConfig>) -> Result<Arc<Self>> {
      let options = parse_url(url)?;
      let config = custom_config.unwrap_or_default();

      let pool = pool_options(&config).connect_with(options).await?;
      debug!(
         max_connections = config.max_connections,
         "connected to MySQL database"
      );

      Ok(Arc::new(Self::from_pool(pool)))
   }

   /// Create the pool without opening any connection.
   ///
   /// The first query establishes the first connection, so connectivity
   /// problems surface there instead of here. Must be called from within a
   /// tokio runtime.
   pub fn connect_lazy(url: &str, custom_config: Option<MysqlDatabaseConfig>) -> Result<Arc<Self>> {
      let options = parse_url(url)?;
      let config = custom_config.unwrap_or_default();

      let pool = pool_options(&config).connect_lazy_with(options);

      Ok(Arc::new(Self::from_pool(pool)))
   }

   /// Wrap an existing pool
   pub fn from_pool(pool: Pool<MySql>) -> Self {
      Self {
         pool,
         closed: AtomicBool::new(false),
      }
   }

   /// Get the connection pool
   ///
   /// Returns [`Error::DatabaseClosed`] once [`close`](Self::close) has run.
   pub fn pool(&self) -> Result<&Pool<MySql>> {
      if self.is_closed() {
         return Err(Error::DatabaseClosed);
      }
      Ok(&self.pool)
   }

   /// Whether [`close`](Self::close) has been called
   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::Acquire)
   }

   /// Close every pooled connection. Calling this more than once is a no-op.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }

      self.pool.close().await;
      debug!("closed MySQL database");
      Ok(())
   }
}

fn parse_url(url: &str) -> Result<MySqlConnectOptions> {
   MySqlConnectOptions::from_str(url).map_err(|e| Error::InvalidUrl(e.to_string()))
}

fn pool_options(config: &MysqlDatabaseConfig) -> MySqlPoolOptions {
   MySqlPoolOptions::new()
      .max_connections(config.max_connections)
      .min_connections(config.min_connections)
      .acquire_timeout(config.acquire_timeout)
      .idle_timeout(config.idle_timeout)
}
