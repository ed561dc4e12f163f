//! Catalog search service

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use sqlx_filter_query::{
   BuiltQuery, FilterConfig, MysqlExecutor, QueryExecutor, Row, SearchBuilder, build_filter_query,
};
use sqlx_mysql_conn_mgr::{MysqlDatabase, MysqlDatabaseConfig};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::{Error, Result};

/// Searches the series catalog through an injected [`QueryExecutor`].
///
/// The filter configuration is validated once, in [`new`](Self::new), so
/// every later search builds against a known-good view and ranking column.
pub struct SeriesCatalog<E> {
   executor: Arc<E>,
   filter: FilterConfig,
}

impl<E: QueryExecutor + 'static> SeriesCatalog<E> {
   /// Create a catalog over `executor`
   pub fn new(executor: E, config: FilterConfig) -> Result<Self> {
      Self::with_shared(Arc::new(executor), config)
   }

   /// Create a catalog over an executor that is shared with other owners
   pub fn with_shared(executor: Arc<E>, config: FilterConfig) -> Result<Self> {
      config.validate()?;
      Ok(Self::from_validated(executor, config))
   }

   fn from_validated(executor: Arc<E>, filter: FilterConfig) -> Self {
      Self { executor, filter }
   }

   /// The filter configuration searches are built with
   pub fn config(&self) -> &FilterConfig {
      &self.filter
   }

   /// The executor queries run on
   pub fn executor(&self) -> &Arc<E> {
      &self.executor
   }

   /// Build the query a search would run, without running it
   pub fn preview(&self, filters: &JsonValue) -> Result<BuiltQuery> {
      Ok(build_filter_query(filters, &self.filter)?)
   }

   /// Start a search that can be adjusted before it is awaited
   pub fn search_query(&self, filters: JsonValue) -> SearchBuilder<E> {
      SearchBuilder::new(self.executor.clone(), filters, self.filter.clone())
   }

   /// Run a filtered search and return every matching row
   pub async fn search(&self, filters: JsonValue) -> Result<Vec<Row>> {
      Ok(self.search_query(filters).await?)
   }

   /// Look up a single series by id
   ///
   /// Returns `Ok(None)` when no row has that id.
   pub async fn get_by_id(&self, id: i64) -> Result<Option<Row>> {
      if id <= 0 {
         return Err(Error::InvalidId(id));
      }
      debug!(id, "looking up series");

      // Limit 2 so a duplicated id is reported instead of hidden
      let filters = json!({ "id": [id], "limit": 2 });
      Ok(self.search_query(filters).fetch_one().await?)
   }
}

impl SeriesCatalog<MysqlExecutor> {
   /// Create a catalog backed by a MySQL pool.
   ///
   /// The filter config is validated before any pool exists. The pool is
   /// created lazily, so an unreachable server surfaces on the first search
   /// rather than here. Must be called from within a tokio runtime.
   pub fn connect(url: &str, config: CatalogConfig) -> Result<Self> {
      config.filter.validate()?;
      let db = MysqlDatabase::connect_lazy(url, Some(config.database))?;
      Ok(Self::from_validated(
         Arc::new(MysqlExecutor::new(db)),
         config.filter,
      ))
   }

   /// Create a catalog backed by a MySQL pool, opening the first connection
   /// immediately
   pub async fn connect_eager(url: &str, config: CatalogConfig) -> Result<Self> {
      config.filter.validate()?;
      let db = MysqlDatabase::connect(url, Some(config.database)).await?;
      Ok(Self::from_validated(
         Arc::new(MysqlExecutor::new(db)),
         config.filter,
      ))
   }

   /// Create a catalog over a database that is already open
   pub fn from_database(db: Arc<MysqlDatabase>, config: FilterConfig) -> Result<Self> {
      Self::new(MysqlExecutor::new(db), config)
   }

   /// Close the underlying pool. Later searches fail with a closed-database
   /// error.
   pub async fn close(&self) -> Result<()> {
      self.executor.database().close().await?;
      Ok(())
   }

   /// Pool settings are fixed at connect time; this reports the ones in use
   pub fn pool_config(&self) -> Result<MysqlDatabaseConfig> {
      let options = self.executor.database().pool()?.options();
      Ok(MysqlDatabaseConfig {
         max_connections: options.get_max_connections(),
         min_connections: options.get_min_connections(),
         acquire_timeout: options.get_acquire_timeout(),
         idle_timeout: options
            .get_idle_timeout()
            .unwrap_or(MysqlDatabaseConfig::default().idle_timeout),
      })
   }
}
