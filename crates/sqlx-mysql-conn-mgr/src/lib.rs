//! # sqlx-mysql-conn-mgr
//!
//! A minimal wrapper around SQLx that owns one MySQL connection pool and
//! gives it explicit close semantics.
//!
//! ## Core Types
//!
//! - **[`MysqlDatabase`]**: Shared database handle wrapping the pool
//! - **[`MysqlDatabaseConfig`]**: Configuration for connection pool settings
//! - **[`Error`]**: Error type for database operations
//!
//! ## Architecture
//!
//! - **Explicit ownership**: the database is created once and passed by `Arc`
//!   to whatever executes queries; there is no process-wide registry
//! - **Lazy connect**: [`MysqlDatabase::connect_lazy`] builds the pool without
//!   touching the network, which keeps startup independent of server health
//! - **Close once**: after [`MysqlDatabase::close`] every pool access fails
//!   with [`Error::DatabaseClosed`]

mod config;
mod database;
mod error;

// Re-export public types
pub use config::MysqlDatabaseConfig;
pub use database::MysqlDatabase;
pub use error::{Error, Result};
