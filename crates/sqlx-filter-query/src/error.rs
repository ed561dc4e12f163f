/// Result type alias for filter query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for building and executing catalog filter queries.
///
/// Validation errors are always raised before any I/O happens; database
/// errors come from the executor and are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] sqlx_mysql_conn_mgr::Error),

   /// MySQL type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// Multiple rows returned where zero or one was expected.
   #[error("lookup returned {0} rows, expected 0 or 1")]
   MultipleRowsReturned(usize),

   /// The filter request is not a JSON object.
   #[error("filter request must be a JSON object, got {0}")]
   InvalidFilterRequest(String),

   /// A recognized filter field carries a value of the wrong shape.
   #[error("invalid value for filter '{field}': {message}")]
   InvalidFilter { field: String, message: String },

   /// Sort direction is not one of `ASC` / `DESC`.
   #[error("invalid sort direction '{0}': expected ASC or DESC")]
   InvalidSortDirection(String),

   /// Limit is not a positive integer.
   #[error("invalid limit '{0}': expected a positive integer")]
   InvalidLimit(String),

   /// Offset is not a non-negative integer.
   #[error("invalid offset '{0}': expected a non-negative integer")]
   InvalidOffset(String),

   /// Configured view or column name contains invalid characters.
   ///
   /// Names must match `[a-zA-Z_][a-zA-Z0-9_.]*` (letters, digits,
   /// underscores, and dots for qualified names like `schema.view`).
   #[error("invalid column name '{name}': must match [a-zA-Z_][a-zA-Z0-9_.]*")]
   InvalidColumnName { name: String },

   /// Filter configuration is inconsistent.
   #[error("invalid filter configuration: {0}")]
   InvalidConfig(String),
}

impl Error {
   pub(crate) fn invalid_filter(field: &str, message: impl Into<String>) -> Self {
      Error::InvalidFilter {
         field: field.to_string(),
         message: message.into(),
      }
   }

   /// Whether the error was caused by malformed caller input.
   ///
   /// These map to a client error at the HTTP layer; everything else is a
   /// server-side failure.
   pub fn is_validation(&self) -> bool {
      matches!(
         self,
         Error::InvalidFilterRequest(_)
            | Error::InvalidFilter { .. }
            | Error::InvalidSortDirection(_)
            | Error::InvalidLimit(_)
            | Error::InvalidOffset(_)
      )
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("MYSQL_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(sqlx_mysql_conn_mgr::Error::DatabaseClosed) => {
            "DATABASE_CLOSED".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::MultipleRowsReturned(_) => "MULTIPLE_ROWS_RETURNED".to_string(),
         Error::InvalidFilterRequest(_) => "INVALID_FILTER_REQUEST".to_string(),
         Error::InvalidFilter { .. } => "INVALID_FILTER".to_string(),
         Error::InvalidSortDirection(_) => "INVALID_SORT_DIRECTION".to_string(),
         Error::InvalidLimit(_) => "INVALID_LIMIT".to_string(),
         Error::InvalidOffset(_) => "INVALID_OFFSET".to_string(),
         Error::InvalidColumnName { .. } => "INVALID_COLUMN_NAME".to_string(),
         Error::InvalidConfig(_) => "INVALID_CONFIG".to_string(),
      }
   }
}
