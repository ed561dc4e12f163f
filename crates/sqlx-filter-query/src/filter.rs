//! Compiling a filter request into a parameterized SELECT.
//!
//! # How It Works
//!
//! The statement always starts as `SELECT * FROM <view> WHERE 1`. Each
//! recognized field present in the request appends one `AND …` condition, in
//! the fixed order of [`FILTER_FIELDS`](crate::registry::FILTER_FIELDS), so two
//! requests with the same content produce byte-identical SQL whatever their
//! key order. Unrecognized keys are skipped. The statement ends with
//! `ORDER BY <ranking column> <direction> LIMIT ?` and, when an offset is
//! requested, `OFFSET ?`.
//!
//! Bind values are appended in exactly the order their placeholders appear,
//! and every bind value is a scalar, so the number of `?` in the SQL always
//! equals the number of parameters.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sqlx_filter_query::{BindValue, FilterConfig, build_filter_query};
//!
//! let query = build_filter_query(
//!    &json!({ "name": "Atta", "sortDirection": "DESC" }),
//!    &FilterConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!    query.sql,
//!    "SELECT * FROM series_view WHERE 1 AND name LIKE ? ORDER BY ranking DESC LIMIT ?"
//! );
//! assert_eq!(
//!    query.params,
//!    vec![BindValue::from("%Atta%"), BindValue::Int(10_000)]
//! );
//! ```

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace, warn};

use crate::config::{FilterConfig, SortDirection};
use crate::registry::FILTER_FIELDS;
use crate::value::{BindValue, coerce_integer, coerce_integer_saturating, json_type_name};
use crate::{Error, Result};

/// A loosely-typed filter request: field name to JSON value.
pub type FilterRequest = Map<String, JsonValue>;

/// Request key for the row limit
pub const LIMIT_KEY: &str = "limit";
/// Request key for the number of rows to skip
pub const OFFSET_KEY: &str = "offset";
/// Request key for the ranking sort direction
pub const SORT_DIRECTION_KEY: &str = "sortDirection";

/// A finished statement ready for an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltQuery {
   /// SQL text with positional `?` placeholders
   pub sql: String,
   /// One value per placeholder, in placeholder order
   pub params: Vec<BindValue>,
}

impl BuiltQuery {
   /// Number of `?` placeholders in the SQL text
   pub fn placeholder_count(&self) -> usize {
      self.sql.matches('?').count()
   }
}

/// Compile a filter request into a parameterized query.
///
/// `filters` must be a JSON object (or null, meaning no filters). Fails
/// without producing any SQL if the config is invalid or any recognized
/// field has a malformed value.
pub fn build_filter_query(filters: &JsonValue, config: &FilterConfig) -> Result<BuiltQuery> {
   match filters {
      JsonValue::Object(request) => build_from_request(request, config),
      JsonValue::Null => build_from_request(&FilterRequest::new(), config),
      other => Err(Error::InvalidFilterRequest(
         json_type_name(other).to_string(),
      )),
   }
}

/// Compile an already-decoded filter map.
pub fn build_from_request(request: &FilterRequest, config: &FilterConfig) -> Result<BuiltQuery> {
   config.validate()?;

   // Resolve paging and sorting first so a bad value fails before any
   // condition is rendered.
   let direction = sort_direction(request)?;
   let limit = limit(request, config)?;
   let offset = offset(request)?;

   let mut sql = format!("SELECT * FROM {} WHERE 1", config.source_view);
   let mut params = Vec::new();

   for field in FILTER_FIELDS {
      let Some(value) = request.get(field.key) else {
         continue;
      };

      if let Some(condition) = field.render(value)? {
         trace!(filter = field.key, fragment = %condition.sql, "rendered filter condition");
         sql.push(' ');
         sql.push_str(&condition.sql);
         params.extend(condition.binds);
      }
   }

   sql.push_str(&format!(
      " ORDER BY {} {} LIMIT ?",
      config.ranking_column,
      direction.as_sql()
   ));
   params.push(BindValue::Int(limit));

   if let Some(offset) = offset {
      sql.push_str(" OFFSET ?");
      params.push(BindValue::Int(offset));
   }

   let query = BuiltQuery { sql, params };
   debug_assert_eq!(query.placeholder_count(), query.params.len());
   debug!(sql = %query.sql, params = query.params.len(), "built filter query");

   Ok(query)
}

fn sort_direction(request: &FilterRequest) -> Result<SortDirection> {
   match request.get(SORT_DIRECTION_KEY) {
      None | Some(JsonValue::Null) => Ok(SortDirection::default()),
      Some(JsonValue::String(s)) => s.parse(),
      Some(other) => Err(Error::InvalidSortDirection(other.to_string())),
   }
}

/// Requested limit, defaulted when absent and clamped to the configured
/// maximum. Never fails for being too large.
fn limit(request: &FilterRequest, config: &FilterConfig) -> Result<i64> {
   // validate() guarantees both limits fit in i64
   let max_limit = config.max_limit as i64;

   let requested = match request.get(LIMIT_KEY) {
      None | Some(JsonValue::Null) => return Ok(config.default_limit as i64),
      Some(value) => match coerce_integer_saturating(value) {
         Some(n) if n > 0 => n,
         _ => return Err(Error::InvalidLimit(display_value(value))),
      },
   };

   if requested > max_limit {
      warn!(requested, max_limit, "clamping filter limit");
      return Ok(max_limit);
   }

   Ok(requested)
}

/// Requested offset; zero means none.
fn offset(request: &FilterRequest) -> Result<Option<i64>> {
   match request.get(OFFSET_KEY) {
      None | Some(JsonValue::Null) => Ok(None),
      Some(value) => match coerce_integer(value) {
         Some(0) => Ok(None),
         Some(n) if n > 0 => Ok(Some(n)),
         _ => Err(Error::InvalidOffset(display_value(value))),
      },
   }
}

/// Strings without their JSON quotes, everything else as JSON
fn display_value(value: &JsonValue) -> String {
   match value {
      JsonValue::String(s) => s.clone(),
      other => other.to_string(),
   }
}
