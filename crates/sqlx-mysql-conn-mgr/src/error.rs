//! Error types for sqlx-mysql-conn-mgr

use thiserror::Error;

/// Errors that may occur when working with sqlx-mysql-conn-mgr
#[derive(Error, Debug)]
pub enum Error {
   /// Error from the sqlx library. Standard sqlx errors are converted to this variant
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// The connection URL could not be parsed
   #[error("Invalid database URL: {0}")]
   InvalidUrl(String),

   /// Database has been closed and cannot be used
   #[error("Database has been closed")]
   DatabaseClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
