use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Building or executing a filter query failed.
   #[error(transparent)]
   Query(#[from] sqlx_filter_query::Error),

   /// Connecting to or closing the database failed.
   #[error(transparent)]
   ConnectionManager(#[from] sqlx_mysql_conn_mgr::Error),

   /// Series ids are positive.
   #[error("invalid series id {0}: expected a positive integer")]
   InvalidId(i64),
}

impl Error {
   /// Whether the caller sent something malformed (a client error).
   pub fn is_validation(&self) -> bool {
      match self {
         Error::Query(e) => e.is_validation(),
         Error::ConnectionManager(_) => false,
         Error::InvalidId(_) => true,
      }
   }

   /// Machine-readable error code.
   pub fn error_code(&self) -> String {
      match self {
         Error::Query(e) => e.error_code(),
         Error::ConnectionManager(sqlx_mysql_conn_mgr::Error::DatabaseClosed) => {
            "DATABASE_CLOSED".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::InvalidId(_) => "INVALID_ID".to_string(),
      }
   }
}

/// Serializes as `{ "code": ..., "message": ... }` for response bodies.
impl Serialize for Error {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      let mut state = serializer.serialize_struct("Error", 2)?;
      state.serialize_field("code", &self.error_code())?;
      state.serialize_field("message", &self.to_string())?;
      state.end()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn query_errors_keep_their_code() {
      let err = Error::from(sqlx_filter_query::Error::InvalidSortDirection("UP".into()));
      assert_eq!(err.error_code(), "INVALID_SORT_DIRECTION");
      assert!(err.is_validation());
   }

   #[test]
   fn closed_database_code() {
      let err = Error::from(sqlx_mysql_conn_mgr::Error::DatabaseClosed);
      assert_eq!(err.error_code(), "DATABASE_CLOSED");
      assert!(!err.is_validation());
   }

   #[test]
   fn invalid_id() {
      let err = Error::InvalidId(0);
      assert_eq!(err.error_code(), "INVALID_ID");
      assert!(err.is_validation());
      assert!(err.to_string().contains("invalid series id 0"));
   }

   #[test]
   fn serializes_code_and_message() {
      let err = Error::from(sqlx_filter_query::Error::InvalidLimit("lots".into()));
      assert_eq!(
         serde_json::to_value(&err).unwrap(),
         json!({
            "code": "INVALID_LIMIT",
            "message": "invalid limit 'lots': expected a positive integer",
         })
      );
   }
}
