//! # sqlx-filter-query
//!
//! Compiles loosely-typed catalog filter requests into parameterized MySQL
//! queries and runs them through a pluggable executor.
//!
//! ## Core Types
//!
//! - **[`build_filter_query`]**: pure compiler from a JSON filter object to a
//!   [`BuiltQuery`] (SQL text plus flat positional parameters)
//! - **[`FilterConfig`]**: source view, ranking column and limit bounds
//! - **[`FILTER_FIELDS`]**: the recognized fields, their columns and
//!   condition kinds, in rendering order
//! - **[`QueryExecutor`]**: the execution seam; [`MysqlExecutor`] runs queries
//!   on a [`sqlx_mysql_conn_mgr::MysqlDatabase`]
//! - **[`SearchBuilder`]**: awaitable build-then-execute search
//!
//! ## Guarantees
//!
//! - The number of `?` placeholders always equals the number of parameters
//! - Unrecognized request keys never reach the SQL text or the parameters
//! - Identical filter content produces identical SQL regardless of key order
//! - Malformed filters fail before any I/O

mod builders;
mod config;
mod decode;
mod error;
mod executor;
mod filter;
mod registry;
mod value;

pub use builders::SearchBuilder;
pub use config::{FilterConfig, SortDirection};
pub use decode::Row;
pub use error::{Error, Result};
pub use executor::{MysqlExecutor, QueryExecutor};
pub use filter::{
   BuiltQuery, FilterRequest, LIMIT_KEY, OFFSET_KEY, SORT_DIRECTION_KEY, build_filter_query,
   build_from_request,
};
pub use registry::{ConditionKind, FILTER_FIELDS, FilterField, RenderedCondition};
pub use value::BindValue;
