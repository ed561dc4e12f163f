//! MySQL value to JSON decoding

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySql, MySqlRow, MySqlValueRef};
use sqlx::{Column, Decode, Row as _, TypeInfo, ValueRef};
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::Error;

/// A decoded result row: column name to value, in select order.
pub type Row = IndexMap<String, JsonValue>;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATETIME_FORMAT: &[BorrowedFormatItem<'_>] =
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATETIME_MICROS_FORMAT: &[BorrowedFormatItem<'_>] =
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// How a MySQL column type is turned into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
   Signed,
   Unsigned,
   Float,
   Double,
   Decimal,
   Text,
   Json,
   Date,
   Time,
   DateTime,
   Binary,
}

impl ColumnKind {
   /// Classify a type by the name sqlx reports for it
   fn from_type_name(name: &str) -> Option<Self> {
      let kind = match name {
         "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            ColumnKind::Signed
         }
         "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
         | "BIGINT UNSIGNED" => ColumnKind::Unsigned,
         "FLOAT" => ColumnKind::Float,
         "DOUBLE" => ColumnKind::Double,
         "DECIMAL" => ColumnKind::Decimal,
         "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            ColumnKind::Text
         }
         "JSON" => ColumnKind::Json,
         "DATE" => ColumnKind::Date,
         "TIME" => ColumnKind::Time,
         "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
         "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            ColumnKind::Binary
         }
         _ => return None,
      };
      Some(kind)
   }
}

/// Decode rows into ordered JSON maps
pub(crate) fn decode_rows(rows: Vec<MySqlRow>) -> Result<Vec<Row>, Error> {
   let mut values = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::default();
      for (i, column) in row.columns().iter().enumerate() {
         let v = row.try_get_raw(i)?;
         let v = to_json(v)?;
         value.insert(column.name().to_string(), v);
      }
      values.push(value);
   }
   Ok(values)
}

/// Convert one MySQL value to JSON.
///
/// Integers stay integers (unsigned included), DECIMAL becomes a number when
/// it parses as `f64`, temporal types become `YYYY-MM-DD[ HH:MM:SS[.ffffff]]`
/// strings, TIME keeps its sign and full hour range, JSON columns are parsed,
/// and binary data is base64-encoded.
pub(crate) fn to_json(value: MySqlValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let type_name = value.type_info().name().to_string();
   let Some(kind) = ColumnKind::from_type_name(&type_name) else {
      return Err(Error::UnsupportedDatatype(type_name));
   };

   let json = match kind {
      ColumnKind::Signed => JsonValue::from(decode::<i64>(value)?),
      ColumnKind::Unsigned => JsonValue::from(decode::<u64>(value)?),
      ColumnKind::Float => JsonValue::from(f64::from(decode::<f32>(value)?)),
      ColumnKind::Double => JsonValue::from(decode::<f64>(value)?),
      ColumnKind::Decimal => decimal_to_json(decode::<String>(value)?),
      ColumnKind::Text => JsonValue::String(decode::<String>(value)?),
      ColumnKind::Json => json_text_to_json(decode::<String>(value)?),
      ColumnKind::Date => temporal(decode::<time::Date>(value)?.format(DATE_FORMAT))?,
      ColumnKind::Time => {
         let raw = decode::<&[u8]>(value)?;
         let text = format_time(raw).ok_or_else(|| {
            Error::Sqlx(sqlx::Error::Decode(
               format!("malformed TIME value ({} bytes)", raw.len()).into(),
            ))
         })?;
         JsonValue::String(text)
      }
      ColumnKind::DateTime => temporal(format_datetime(decode::<PrimitiveDateTime>(value)?))?,
      ColumnKind::Binary => binary_to_json(&decode::<Vec<u8>>(value)?),
   };

   Ok(json)
}

fn decode<'r, T>(value: MySqlValueRef<'r>) -> Result<T, Error>
where
   T: Decode<'r, MySql>,
{
   T::decode(value).map_err(|e| Error::Sqlx(sqlx::Error::Decode(e)))
}

fn temporal(formatted: Result<String, time::error::Format>) -> Result<JsonValue, Error> {
   formatted
      .map(JsonValue::String)
      .map_err(|e| Error::Sqlx(sqlx::Error::Decode(Box::new(e))))
}

/// DECIMAL as a number when it fits `f64`, otherwise the exact text
fn decimal_to_json(text: String) -> JsonValue {
   match text.parse::<f64>() {
      Ok(number) if number.is_finite() => JsonValue::from(number),
      _ => JsonValue::String(text),
   }
}

/// Parsed JSON, or the raw text if the server sent something unparsable
fn json_text_to_json(text: String) -> JsonValue {
   serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
}

fn binary_to_json(bytes: &[u8]) -> JsonValue {
   JsonValue::String(BASE64.encode(bytes))
}

/// Seconds, with microseconds only when there are any
fn format_datetime(value: PrimitiveDateTime) -> Result<String, time::error::Format> {
   if value.nanosecond() == 0 {
      value.format(DATETIME_FORMAT)
   } else {
      value.format(DATETIME_MICROS_FORMAT)
   }
}

/// Render a MySQL TIME as `[-]HH:MM:SS[.ffffff]`.
///
/// TIME is a signed duration of up to 838 hours, so it does not fit a
/// time-of-day type. Binary rows carry a length byte (0, 8 or 12) followed
/// by sign, days, hours, minutes, seconds and optional microseconds; text
/// rows already hold the formatted value.
fn format_time(raw: &[u8]) -> Option<String> {
   match raw.first().copied() {
      None | Some(0) => Some("00:00:00".to_string()),
      Some(len @ (8 | 12)) if raw.len() == usize::from(len) + 1 => {
         let body = &raw[1..];
         let sign = if body[0] == 1 { "-" } else { "" };
         let days = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
         let hours = days.saturating_mul(24).saturating_add(u32::from(body[5]));
         let (minutes, seconds) = (body[6], body[7]);

         let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
         if len == 12 {
            let micros = u32::from_le_bytes([body[8], body[9], body[10], body[11]]);
            if micros != 0 {
               text.push_str(&format!(".{micros:06}"));
            }
         }
         Some(text)
      }
      Some(b'-' | b'0'..=b'9') => std::str::from_utf8(raw).ok().map(str::to_string),
      Some(_) => None,
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;
   use time::macros::datetime;

   // ─── type dispatch ───

   #[test]
   fn test_integer_types_are_signed() {
      for name in ["BOOLEAN", "TINYINT", "SMALLINT", "MEDIUMINT", "INT", "BIGINT", "YEAR"] {
         assert_eq!(ColumnKind::from_type_name(name), Some(ColumnKind::Signed), "{name}");
      }
   }

   #[test]
   fn test_unsigned_types() {
      for name in ["TINYINT UNSIGNED", "INT UNSIGNED", "BIGINT UNSIGNED"] {
         assert_eq!(ColumnKind::from_type_name(name), Some(ColumnKind::Unsigned), "{name}");
      }
   }

   #[test]
   fn test_text_and_binary_types() {
      assert_eq!(ColumnKind::from_type_name("VARCHAR"), Some(ColumnKind::Text));
      assert_eq!(ColumnKind::from_type_name("ENUM"), Some(ColumnKind::Text));
      assert_eq!(ColumnKind::from_type_name("VARBINARY"), Some(ColumnKind::Binary));
      assert_eq!(ColumnKind::from_type_name("LONGBLOB"), Some(ColumnKind::Binary));
   }

   #[test]
   fn test_temporal_types() {
      assert_eq!(ColumnKind::from_type_name("DATE"), Some(ColumnKind::Date));
      assert_eq!(ColumnKind::from_type_name("TIME"), Some(ColumnKind::Time));
      assert_eq!(ColumnKind::from_type_name("TIMESTAMP"), Some(ColumnKind::DateTime));
   }

   #[test]
   fn test_unknown_types_are_unsupported() {
      assert_eq!(ColumnKind::from_type_name("GEOMETRY"), None);
      assert_eq!(ColumnKind::from_type_name("NULL"), None);
      assert_eq!(ColumnKind::from_type_name("varchar"), None);
   }

   // ─── value conversion ───

   #[test]
   fn test_decimal_as_number() {
      assert_eq!(decimal_to_json("12.50".into()), json!(12.5));
      assert_eq!(decimal_to_json("-3".into()), json!(-3.0));
   }

   #[test]
   fn test_decimal_falls_back_to_text() {
      assert_eq!(decimal_to_json("not-a-number".into()), json!("not-a-number"));
   }

   #[test]
   fn test_json_column_parsed() {
      assert_eq!(
         json_text_to_json(r#"{"tags": ["a", "b"]}"#.into()),
         json!({"tags": ["a", "b"]})
      );
   }

   #[test]
   fn test_json_column_falls_back_to_text() {
      assert_eq!(json_text_to_json("{broken".into()), json!("{broken"));
   }

   #[test]
   fn test_binary_is_base64() {
      assert_eq!(binary_to_json(b"hello"), json!("aGVsbG8="));
      assert_eq!(binary_to_json(&[]), json!(""));
   }

   // ─── temporal ───

   #[test]
   fn test_datetime_without_fraction() {
      assert_eq!(
         format_datetime(datetime!(2013-04-07 00:00:00)).unwrap(),
         "2013-04-07 00:00:00"
      );
   }

   #[test]
   fn test_datetime_keeps_microseconds() {
      assert_eq!(
         format_datetime(datetime!(2013-04-07 12:30:05.25)).unwrap(),
         "2013-04-07 12:30:05.250000"
      );
   }

   #[test]
   fn test_time_zero() {
      assert_eq!(format_time(&[0]).as_deref(), Some("00:00:00"));
   }

   #[test]
   fn test_time_binary_within_a_day() {
      let raw = [8, 0, 0, 0, 0, 0, 13, 45, 9];
      assert_eq!(format_time(&raw).as_deref(), Some("13:45:09"));
   }

   #[test]
   fn test_time_binary_beyond_a_day() {
      // 34 days 22:59:59 is 838:59:59, the largest TIME
      let raw = [8, 0, 34, 0, 0, 0, 22, 59, 59];
      assert_eq!(format_time(&raw).as_deref(), Some("838:59:59"));
   }

   #[test]
   fn test_time_binary_negative_with_micros() {
      let micros = 1_500u32.to_le_bytes();
      let raw = [
         12, 1, 1, 0, 0, 0, 2, 3, 4, micros[0], micros[1], micros[2], micros[3],
      ];
      assert_eq!(format_time(&raw).as_deref(), Some("-26:03:04.001500"));
   }

   #[test]
   fn test_time_text_passthrough() {
      assert_eq!(format_time(b"-120:00:00").as_deref(), Some("-120:00:00"));
      assert_eq!(format_time(b"08:15:00.5").as_deref(), Some("08:15:00.5"));
   }

   #[test]
   fn test_time_malformed() {
      assert_eq!(format_time(&[8, 0, 0]), None);
      assert_eq!(format_time(&[5, 1, 2, 3, 4, 5]), None);
   }
}
