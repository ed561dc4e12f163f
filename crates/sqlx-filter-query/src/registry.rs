//! Condition renderers for the recognized filter fields.
//!
//! Every filterable field appears exactly once in [`FILTER_FIELDS`], in the
//! order its condition is emitted. Each field names its view column and one
//! of a handful of renderer kinds; rendering turns the field's JSON value
//! into a SQL fragment plus the values bound to its placeholders.
//!
//! A renderer returns `Ok(None)` when the value counts as absent (null,
//! blank string, empty list for the list fields). Shape mismatches,
//! including a range with no bounds, are validation errors.

use serde_json::Value as JsonValue;

use crate::value::{BindValue, coerce_integer, contains_pattern, json_type_name};
use crate::{Error, Result};

/// How a field's value becomes a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
   /// `column LIKE ?` bound to `%value%`
   Substring,
   /// `column = ?` for a single integer, `column BETWEEN ? AND ?` for a pair
   RangeOrEqual,
   /// `column = ?` with the exact string
   Equality,
   /// `(column LIKE ? OR column LIKE ? ...)`, one `%value%` per entry
   AnyOfSubstrings,
   /// `column IN (?, ?, ...)`, one placeholder per entry
   SetMembership,
}

/// A recognized filter field.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
   /// Key in the filter request
   pub key: &'static str,
   /// Column in the source view
   pub column: &'static str,
   pub kind: ConditionKind,
}

/// Recognized filter fields in rendering order.
///
/// The order here, not the request's key order, decides the SQL text.
pub const FILTER_FIELDS: &[FilterField] = &[
   FilterField {
      key: "name",
      column: "name",
      kind: ConditionKind::Substring,
   },
   FilterField {
      key: "chapterCount",
      column: "chapter_count",
      kind: ConditionKind::RangeOrEqual,
   },
   FilterField {
      key: "description",
      column: "description",
      kind: ConditionKind::Substring,
   },
   FilterField {
      key: "year",
      column: "year",
      kind: ConditionKind::RangeOrEqual,
   },
   FilterField {
      key: "demographicName",
      column: "demographic_name",
      kind: ConditionKind::Equality,
   },
   FilterField {
      key: "genreNames",
      column: "genre_names",
      kind: ConditionKind::AnyOfSubstrings,
   },
   FilterField {
      key: "id",
      column: "id",
      kind: ConditionKind::SetMembership,
   },
];

/// One field's rendered condition: a fragment with `?` placeholders and the
/// values bound to them, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCondition {
   pub sql: String,
   pub binds: Vec<BindValue>,
}

impl FilterField {
   /// Look up a recognized field by its request key
   pub fn lookup(key: &str) -> Option<&'static FilterField> {
      FILTER_FIELDS.iter().find(|f| f.key == key)
   }

   /// Render this field's condition from its request value.
   pub fn render(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      if value.is_null() {
         return Ok(None);
      }

      match self.kind {
         ConditionKind::Substring => self.render_substring(value),
         ConditionKind::RangeOrEqual => self.render_range_or_equal(value),
         ConditionKind::Equality => self.render_equality(value),
         ConditionKind::AnyOfSubstrings => self.render_any_of_substrings(value),
         ConditionKind::SetMembership => self.render_set_membership(value),
      }
   }

   fn render_substring(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      let text = self.expect_str(value)?.trim();
      if text.is_empty() {
         return Ok(None);
      }

      Ok(Some(RenderedCondition {
         sql: format!("AND {} LIKE ?", self.column),
         binds: vec![BindValue::Text(contains_pattern(text))],
      }))
   }

   fn render_range_or_equal(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      let bounds = match value {
         JsonValue::Array(items) => items
            .iter()
            .map(|item| self.expect_integer(item))
            .collect::<Result<Vec<_>>>()?,
         scalar => vec![self.expect_integer(scalar)?],
      };

      // Bounds are bound as given; the caller orders them.
      match bounds.as_slice() {
         [exact] => Ok(Some(RenderedCondition {
            sql: format!("AND {} = ?", self.column),
            binds: vec![BindValue::Int(*exact)],
         })),
         [low, high] => Ok(Some(RenderedCondition {
            sql: format!("AND {} BETWEEN ? AND ?", self.column),
            binds: vec![BindValue::Int(*low), BindValue::Int(*high)],
         })),
         other => Err(Error::invalid_filter(
            self.key,
            format!(
               "expected an integer or a [min, max] pair, got {} values",
               other.len()
            ),
         )),
      }
   }

   fn render_equality(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      let text = self.expect_str(value)?;
      if text.trim().is_empty() {
         return Ok(None);
      }

      Ok(Some(RenderedCondition {
         sql: format!("AND {} = ?", self.column),
         binds: vec![BindValue::Text(text.to_string())],
      }))
   }

   fn render_any_of_substrings(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      let mut binds = Vec::new();
      for item in self.list_items(value) {
         let text = self.expect_str(item)?.trim();
         if !text.is_empty() {
            binds.push(BindValue::Text(contains_pattern(text)));
         }
      }

      if binds.is_empty() {
         return Ok(None);
      }

      let alternatives = vec![format!("{} LIKE ?", self.column); binds.len()];
      Ok(Some(RenderedCondition {
         sql: format!("AND ({})", alternatives.join(" OR ")),
         binds,
      }))
   }

   fn render_set_membership(&self, value: &JsonValue) -> Result<Option<RenderedCondition>> {
      let binds = self
         .list_items(value)
         .into_iter()
         .map(|item| self.expect_integer(item).map(BindValue::Int))
         .collect::<Result<Vec<_>>>()?;

      if binds.is_empty() {
         return Ok(None);
      }

      let placeholders = vec!["?"; binds.len()];
      Ok(Some(RenderedCondition {
         sql: format!("AND {} IN ({})", self.column, placeholders.join(", ")),
         binds,
      }))
   }

   /// A list field also accepts a bare scalar as a one-element list.
   fn list_items<'v>(&self, value: &'v JsonValue) -> Vec<&'v JsonValue> {
      match value {
         JsonValue::Array(items) => items.iter().collect(),
         scalar => vec![scalar],
      }
   }

   fn expect_str<'v>(&self, value: &'v JsonValue) -> Result<&'v str> {
      value.as_str().ok_or_else(|| {
         Error::invalid_filter(
            self.key,
            format!("expected a string, got {}", json_type_name(value)),
         )
      })
   }

   fn expect_integer(&self, value: &JsonValue) -> Result<i64> {
      coerce_integer(value).ok_or_else(|| {
         Error::invalid_filter(self.key, format!("expected an integer, got {}", value))
      })
   }
}
