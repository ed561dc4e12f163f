//! # series-catalog
//!
//! Search service for a series catalog stored behind a MySQL view.
//!
//! Callers send a loosely-typed JSON filter object (name, chapter count,
//! year, genres, ids, paging and sort direction). [`SeriesCatalog`] compiles
//! it into a single parameterized `SELECT` and returns the matching rows as
//! ordered JSON maps.
//!
//! # Example
//!
//! ```ignore
//! use serde_json::json;
//! use series_catalog::{CatalogConfig, SeriesCatalog};
//!
//! let catalog = SeriesCatalog::connect("mysql://app@localhost/catalog", CatalogConfig::default())?;
//!
//! let rows = catalog
//!    .search(json!({ "genreNames": ["Action", "Drama"], "year": [2010, 2020], "limit": 20 }))
//!    .await?;
//!
//! let one = catalog.get_by_id(42).await?;
//! catalog.close().await?;
//! ```
//!
//! The query builder, executor seam and row decoding live in
//! [`sqlx_filter_query`]; pool ownership lives in [`sqlx_mysql_conn_mgr`].

mod catalog;
mod config;
mod error;

pub use catalog::SeriesCatalog;
pub use config::CatalogConfig;
pub use error::{Error, Result};

// Re-export the pieces callers need to drive a catalog
pub use sqlx_filter_query::{
   BindValue, BuiltQuery, FilterConfig, MysqlExecutor, QueryExecutor, Row, SearchBuilder,
   SortDirection,
};
pub use sqlx_mysql_conn_mgr::{MysqlDatabase, MysqlDatabaseConfig};
