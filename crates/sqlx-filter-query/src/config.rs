//! Filter query configuration and sort direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Sort direction for the ranking column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   #[default]
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// SQL keyword for this direction
   pub fn as_sql(self) -> &'static str {
      match self {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      }
   }
}

impl FromStr for SortDirection {
   type Err = Error;

   /// Parse exactly `ASC` or `DESC`. Anything else, including other
   /// casings, is rejected rather than falling back to a default.
   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s {
         "ASC" => Ok(SortDirection::Asc),
         "DESC" => Ok(SortDirection::Desc),
         _ => Err(Error::InvalidSortDirection(s.to_string())),
      }
   }
}

impl fmt::Display for SortDirection {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.as_sql())
   }
}

/// Where and how a filter query selects rows.
///
/// # Examples
///
/// ```
/// use sqlx_filter_query::FilterConfig;
///
/// let config = FilterConfig {
///    source_view: "catalog.series_view".into(),
///    ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
   /// View (or table) every query selects from
   ///
   /// Default: `series_view`
   pub source_view: String,

   /// Column the results are ordered by
   ///
   /// Default: `ranking`
   pub ranking_column: String,

   /// Largest row count a caller may request; larger limits are clamped
   ///
   /// Default: 10000
   pub max_limit: u64,

   /// Row count used when the request carries no limit
   ///
   /// Default: 10000
   pub default_limit: u64,
}

impl Default for FilterConfig {
   fn default() -> Self {
      Self {
         source_view: "series_view".to_string(),
         ranking_column: "ranking".to_string(),
         max_limit: 10_000,
         default_limit: 10_000,
      }
   }
}

impl FilterConfig {
   /// Check that the names are safe to interpolate and the limits agree.
   pub fn validate(&self) -> Result<(), Error> {
      validate_column_name(&self.source_view)?;
      validate_column_name(&self.ranking_column)?;

      if self.max_limit == 0 {
         return Err(Error::InvalidConfig(
            "maxLimit must be greater than zero".to_string(),
         ));
      }
      if self.max_limit > i64::MAX as u64 {
         return Err(Error::InvalidConfig(format!(
            "maxLimit must not exceed {}",
            i64::MAX
         )));
      }
      if self.default_limit == 0 || self.default_limit > self.max_limit {
         return Err(Error::InvalidConfig(format!(
            "defaultLimit must be between 1 and maxLimit ({})",
            self.max_limit
         )));
      }

      Ok(())
   }
}

/// Validate that a view or column name is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_.]*`, which covers plain
/// names, qualified names (e.g., `schema.view`), and underscored identifiers.
pub(crate) fn validate_column_name(name: &str) -> Result<(), Error> {
   let invalid = || Error::InvalidColumnName {
      name: name.to_string(),
   };

   let mut chars = name.chars();
   let first = chars.next().ok_or_else(invalid)?;
   if !first.is_ascii_alphabetic() && first != '_' {
      return Err(invalid());
   }

   if chars.any(|ch| !ch.is_ascii_alphanumeric() && ch != '_' && ch != '.') {
      return Err(invalid());
   }

   Ok(())
}

#[cfg(test)]
mod tests {
   use super::*;

   // ─── validate_column_name ───

   #[test]
   fn column_name_valid_simple() {
      assert!(validate_column_name("ranking").is_ok());
      assert!(validate_column_name("series_view").is_ok());
      assert!(validate_column_name("_private").is_ok());
      assert!(validate_column_name("col_123").is_ok());
   }

   #[test]
   fn column_name_valid_qualified() {
      assert!(validate_column_name("catalog.series_view").is_ok());
   }

   #[test]
   fn column_name_rejects_empty() {
      assert!(validate_column_name("").is_err());
   }

   #[test]
   fn column_name_rejects_injection() {
      assert!(validate_column_name("ranking; DROP TABLE series --").is_err());
      assert!(validate_column_name("ranking)--").is_err());
      assert!(validate_column_name("1bad").is_err());
      assert!(validate_column_name("col name").is_err());
      assert!(validate_column_name("col?").is_err());
   }

   // ─── FilterConfig ───

   #[test]
   fn default_config_is_valid() {
      let config = FilterConfig::default();
      assert!(config.validate().is_ok());
      assert_eq!(config.max_limit, 10_000);
      assert_eq!(config.default_limit, 10_000);
   }

   #[test]
   fn config_rejects_unsafe_view() {
      let config = FilterConfig {
         source_view: "series_view WHERE 0; --".into(),
         ..Default::default()
      };
      assert!(matches!(
         config.validate(),
         Err(Error::InvalidColumnName { .. })
      ));
   }

   #[test]
   fn config_rejects_zero_max_limit() {
      let config = FilterConfig {
         max_limit: 0,
         ..Default::default()
      };
      assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
   }

   #[test]
   fn config_rejects_default_above_max() {
      let config = FilterConfig {
         max_limit: 50,
         default_limit: 100,
         ..Default::default()
      };
      assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
   }

   #[test]
   fn config_deserializes_camel_case_with_defaults() {
      let config: FilterConfig =
         serde_json::from_str(r#"{"sourceView": "anime_view", "maxLimit": 500, "defaultLimit": 50}"#)
            .unwrap();
      assert_eq!(config.source_view, "anime_view");
      assert_eq!(config.ranking_column, "ranking");
      assert_eq!(config.max_limit, 500);
      assert_eq!(config.default_limit, 50);
   }

   // ─── SortDirection ───

   #[test]
   fn sort_direction_parses_exact_literals() {
      assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
      assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
   }

   #[test]
   fn sort_direction_is_not_case_folded() {
      for input in ["desc", "Desc", " DESC", "asc ", "Asc"] {
         let err = input.parse::<SortDirection>().unwrap_err();
         assert!(matches!(err, Error::InvalidSortDirection(ref s) if s == input));
      }
   }

   #[test]
   fn sort_direction_rejects_unknown() {
      let err = "SIDEWAYS".parse::<SortDirection>().unwrap_err();
      assert!(matches!(err, Error::InvalidSortDirection(ref s) if s == "SIDEWAYS"));
      assert!("".parse::<SortDirection>().is_err());
      assert!("ascending".parse::<SortDirection>().is_err());
   }

   #[test]
   fn sort_direction_defaults_to_asc() {
      assert_eq!(SortDirection::default(), SortDirection::Asc);
   }

   #[test]
   fn sort_direction_serializes_to_upper_case() {
      assert_eq!(
         serde_json::to_string(&SortDirection::Asc).unwrap(),
         "\"ASC\""
      );
      assert_eq!(SortDirection::Desc.to_string(), "DESC");
   }
}
