//! The seam between query building and query execution.

use std::future::Future;
use std::sync::Arc;

use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use sqlx_mysql_conn_mgr::MysqlDatabase;
use tracing::debug;

use crate::Result;
use crate::decode::{Row, decode_rows};
use crate::value::BindValue;

/// Runs a parameterized SELECT and returns its rows.
///
/// Any driver-level failure is returned as-is; callers treat it as opaque
/// and do not retry.
pub trait QueryExecutor: Send + Sync {
   fn fetch_all(
      &self,
      sql: &str,
      params: &[BindValue],
   ) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

impl<E: QueryExecutor> QueryExecutor for Arc<E> {
   fn fetch_all(
      &self,
      sql: &str,
      params: &[BindValue],
   ) -> impl Future<Output = Result<Vec<Row>>> + Send {
      (**self).fetch_all(sql, params)
   }
}

/// Executes queries on a MySQL connection pool
#[derive(Debug, Clone)]
pub struct MysqlExecutor {
   db: Arc<MysqlDatabase>,
}

impl MysqlExecutor {
   pub fn new(db: Arc<MysqlDatabase>) -> Self {
      Self { db }
   }

   /// The underlying database
   pub fn database(&self) -> &Arc<MysqlDatabase> {
      &self.db
   }
}

impl QueryExecutor for MysqlExecutor {
   async fn fetch_all(&self, sql: &str, params: &[BindValue]) -> Result<Vec<Row>> {
      let pool = self.db.pool()?;

      let mut q = sqlx::query(sql);
      for value in params {
         q = bind_value(q, value);
      }

      let rows = q.fetch_all(pool).await?;
      debug!(rows = rows.len(), "fetched rows");

      decode_rows(rows)
   }
}

/// Bind one scalar to the next positional placeholder
fn bind_value<'q>(
   query: Query<'q, MySql, MySqlArguments>,
   value: &BindValue,
) -> Query<'q, MySql, MySqlArguments> {
   match value {
      BindValue::Int(int_val) => query.bind(*int_val),
      BindValue::Text(text) => query.bind(text.clone()),
   }
}
