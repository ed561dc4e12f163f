//! Awaitable search builder

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Value as JsonValue, json};

use crate::config::{FilterConfig, SortDirection};
use crate::decode::Row;
use crate::executor::QueryExecutor;
use crate::filter::{BuiltQuery, LIMIT_KEY, OFFSET_KEY, SORT_DIRECTION_KEY, build_filter_query};
use crate::{Error, Result};

/// Builder for a filtered catalog search returning multiple rows.
///
/// The query is compiled when the builder is executed, and a malformed
/// filter fails there before the executor is called.
///
/// ```ignore
/// let rows = SearchBuilder::new(executor, json!({ "genreNames": ["Drama"] }), config)
///    .sort(SortDirection::Desc)
///    .page(20, 40)
///    .await?;
/// ```
pub struct SearchBuilder<E> {
   executor: Arc<E>,
   filters: JsonValue,
   config: FilterConfig,
}

impl<E: QueryExecutor + 'static> SearchBuilder<E> {
   pub fn new(executor: Arc<E>, filters: JsonValue, config: FilterConfig) -> Self {
      Self {
         executor,
         filters,
         config,
      }
   }

   /// Override the sort direction carried by the filters
   pub fn sort(self, direction: SortDirection) -> Self {
      self.with_key(SORT_DIRECTION_KEY, json!(direction.as_sql()))
   }

   /// Override the limit and offset carried by the filters
   pub fn page(self, limit: u64, offset: u64) -> Self {
      self
         .with_key(LIMIT_KEY, json!(limit))
         .with_key(OFFSET_KEY, json!(offset))
   }

   /// Set a key on the filter object. Non-object filters are left alone so
   /// that execution still reports them as invalid.
   fn with_key(mut self, key: &str, value: JsonValue) -> Self {
      if self.filters.is_null() {
         self.filters = JsonValue::Object(Default::default());
      }
      if let JsonValue::Object(map) = &mut self.filters {
         map.insert(key.to_string(), value);
      }
      self
   }

   /// Compile the query without executing it
   pub fn query(&self) -> Result<BuiltQuery> {
      build_filter_query(&self.filters, &self.config)
   }

   /// Compile and execute the search
   pub async fn execute(self) -> Result<Vec<Row>> {
      let query = self.query()?;
      self.executor.fetch_all(&query.sql, &query.params).await
   }

   /// Compile and execute, expecting at most one row
   pub async fn fetch_one(self) -> Result<Option<Row>> {
      let mut rows = self.execute().await?;
      match rows.len() {
         0 => Ok(None),
         1 => Ok(rows.pop()),
         count => Err(Error::MultipleRowsReturned(count)),
      }
   }
}

impl<E: QueryExecutor + 'static> IntoFuture for SearchBuilder<E> {
   type Output = Result<Vec<Row>>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}
