//! Property tests for filter query compilation.
//!
//! Verifies that placeholder and parameter counts always agree, that key
//! order never changes the SQL, and that unrecognized keys never leak.

use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue, json};
use sqlx_filter_query::{FilterConfig, build_filter_query};

// ============================================================================
// Generators
// ============================================================================

/// Free text, including characters that matter to SQL and LIKE
fn arb_text() -> impl Strategy<Value = String> {
   "[A-Za-z0-9 %_?'\\\\]{0,12}"
}

/// A range field: bare integer, `[min, max]` in any order, or a one-element list
fn arb_range() -> impl Strategy<Value = JsonValue> {
   prop_oneof![
      any::<i32>().prop_map(|n| json!(n)),
      (any::<i32>(), any::<i32>()).prop_map(|(a, b)| json!([a, b])),
      any::<i32>().prop_map(|n| json!([n])),
   ]
}

fn arb_genres() -> impl Strategy<Value = JsonValue> {
   prop::collection::vec(arb_text(), 0..5).prop_map(|genres| json!(genres))
}

fn arb_ids() -> impl Strategy<Value = JsonValue> {
   prop::collection::vec(0..1_000_000i64, 0..8).prop_map(|ids| json!(ids))
}

fn arb_sort() -> impl Strategy<Value = JsonValue> {
   prop_oneof![Just(json!("ASC")), Just(json!("DESC"))]
}

/// Keys the builder does not recognize, chosen so none is a substring of
/// the generated SQL
fn arb_unknown() -> impl Strategy<Value = (String, JsonValue)> {
   (
      prop_oneof![
         Just("studio"),
         Just("ratingMin"),
         Just("x; DROP TABLE series"),
         Just("__proto__"),
      ],
      arb_text(),
   )
      .prop_map(|(k, v)| (k.to_string(), json!(v)))
}

/// Valid filter entries in a random order
fn arb_entries() -> impl Strategy<Value = Vec<(String, JsonValue)>> {
   (
      prop::option::of(arb_text()),
      prop::option::of(arb_range()),
      prop::option::of(arb_text()),
      prop::option::of(arb_range()),
      prop::option::of(arb_text()),
      prop::option::of(arb_genres()),
      prop::option::of(arb_ids()),
      prop::option::of(1..50_000i64),
      prop::option::of(0..5_000i64),
      prop::option::of(arb_sort()),
   )
      .prop_map(
         |(name, chapters, description, year, demographic, genres, ids, limit, offset, sort)| {
            let mut entries = Vec::new();
            let mut push = |key: &str, value: Option<JsonValue>| {
               if let Some(value) = value {
                  entries.push((key.to_string(), value));
               }
            };
            push("name", name.map(JsonValue::from));
            push("chapterCount", chapters);
            push("description", description.map(JsonValue::from));
            push("year", year);
            push("demographicName", demographic.map(JsonValue::from));
            push("genreNames", genres);
            push("id", ids);
            push("limit", limit.map(JsonValue::from));
            push("offset", offset.map(JsonValue::from));
            push("sortDirection", sort);
            entries
         },
      )
      .prop_shuffle()
}

fn to_object(entries: &[(String, JsonValue)]) -> JsonValue {
   let mut map = Map::new();
   for (key, value) in entries {
      map.insert(key.clone(), value.clone());
   }
   JsonValue::Object(map)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
   #[test]
   fn placeholders_equal_params(entries in arb_entries()) {
      let query = build_filter_query(&to_object(&entries), &FilterConfig::default()).unwrap();

      prop_assert_eq!(query.placeholder_count(), query.params.len());
   }

   #[test]
   fn key_order_is_irrelevant(entries in arb_entries()) {
      let config = FilterConfig::default();
      let shuffled = build_filter_query(&to_object(&entries), &config).unwrap();

      let mut sorted_entries = entries.clone();
      sorted_entries.sort_by(|a, b| a.0.cmp(&b.0));
      let sorted = build_filter_query(&to_object(&sorted_entries), &config).unwrap();

      prop_assert_eq!(&shuffled.sql, &sorted.sql);
      prop_assert_eq!(&shuffled.params, &sorted.params);
   }

   #[test]
   fn unknown_keys_are_inert(
      entries in arb_entries(),
      unknown in prop::collection::vec(arb_unknown(), 1..4),
   ) {
      let config = FilterConfig::default();
      let clean = build_filter_query(&to_object(&entries), &config).unwrap();

      let mut polluted_entries = entries.clone();
      polluted_entries.extend(unknown.iter().cloned());
      let polluted = build_filter_query(&to_object(&polluted_entries), &config).unwrap();

      prop_assert_eq!(&clean, &polluted);
      for (key, _) in &unknown {
         prop_assert!(!polluted.sql.contains(key.as_str()));
      }
   }

   #[test]
   fn limit_never_exceeds_max(limit in 1..i64::MAX, max_limit in 1..100_000u64) {
      let config = FilterConfig {
         max_limit,
         default_limit: max_limit,
         ..Default::default()
      };
      let query = build_filter_query(&json!({ "limit": limit }), &config).unwrap();

      let bound = serde_json::to_value(query.params.last().unwrap()).unwrap();
      prop_assert_eq!(bound, json!(limit.min(max_limit as i64)));
   }
}
