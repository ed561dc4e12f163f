//! Bind values and loose input coercion

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A single positional parameter for a `?` placeholder.
///
/// Only scalars exist here, so a parameter list can never contain a nested
/// list; list-valued filters contribute one `BindValue` per element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
   Int(i64),
   Text(String),
}

impl From<i64> for BindValue {
   fn from(value: i64) -> Self {
      BindValue::Int(value)
   }
}

impl From<String> for BindValue {
   fn from(value: String) -> Self {
      BindValue::Text(value)
   }
}

impl From<&str> for BindValue {
   fn from(value: &str) -> Self {
      BindValue::Text(value.to_string())
   }
}

/// Coerce a loosely-typed JSON value to an integer.
///
/// Accepts JSON integers, floats without a fractional part, and strings
/// that parse as an integer after trimming. Values outside the `i64` range
/// are rejected, never rounded to a different number.
pub(crate) fn coerce_integer(value: &JsonValue) -> Option<i64> {
   match value {
      JsonValue::Number(number) => {
         if let Some(int_val) = number.as_i64() {
            Some(int_val)
         } else if number.is_u64() {
            None
         } else {
            let float_val = number.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            let in_range = float_val >= i64::MIN as f64 && float_val < i64::MAX as f64;
            if in_range && float_val.fract() == 0.0 {
               Some(float_val as i64)
            } else {
               None
            }
         }
      }
      JsonValue::String(s) => s.trim().parse().ok(),
      _ => None,
   }
}

/// Like [`coerce_integer`], but a positive integer too large for `i64`
/// saturates at `i64::MAX` instead of being rejected.
///
/// Only for values that are clamped afterwards anyway, such as a row limit.
pub(crate) fn coerce_integer_saturating(value: &JsonValue) -> Option<i64> {
   if let Some(int_val) = coerce_integer(value) {
      return Some(int_val);
   }

   let too_large = match value {
      JsonValue::Number(number) => {
         number.is_u64()
            || number
               .as_f64()
               .is_some_and(|f| f.is_finite() && f.fract() == 0.0 && f > 0.0)
      }
      JsonValue::String(s) => s.trim().parse::<u128>().is_ok(),
      _ => false,
   };
   too_large.then_some(i64::MAX)
}

/// Describe the JSON type of a value for error messages
pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
   match value {
      JsonValue::Null => "null",
      JsonValue::Bool(_) => "boolean",
      JsonValue::Number(_) => "number",
      JsonValue::String(_) => "string",
      JsonValue::Array(_) => "array",
      JsonValue::Object(_) => "object",
   }
}

/// Escape LIKE metacharacters (`%`, `_`, `\`) so user input matches literally.
///
/// MySQL's default LIKE escape character is the backslash, so no `ESCAPE`
/// clause is needed.
pub(crate) fn escape_like_pattern(s: &str) -> String {
   s.replace('\\', "\\\\")
      .replace('%', "\\%")
      .replace('_', "\\_")
}

/// Wrap user input in `%…%` for a substring LIKE match
pub(crate) fn contains_pattern(s: &str) -> String {
   format!("%{}%", escape_like_pattern(s))
}
