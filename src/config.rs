//! Service configuration

use serde::Deserialize;
use sqlx_filter_query::FilterConfig;
use sqlx_mysql_conn_mgr::MysqlDatabaseConfig;

/// Configuration for a [`SeriesCatalog`](crate::SeriesCatalog)
///
/// # Examples
///
/// ```
/// use series_catalog::CatalogConfig;
///
/// let mut config = CatalogConfig::default();
/// config.filter.max_limit = 500;
/// config.filter.default_limit = 50;
/// config.database.max_connections = 4;
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
   /// Source view, ranking column and limit bounds for searches
   pub filter: FilterConfig,

   /// Pool settings, used when the catalog opens its own connection
   pub database: MysqlDatabaseConfig,
}
