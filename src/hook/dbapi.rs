//! Generic DB-API helpers shared by SQL hooks.
//!
//! A hook only has to say how to open a connection; statement execution,
//! fetching, dataframe building and row insertion come from the provided
//! methods of [`DbApiHook`].

use crate::client::{DbConnection, Row};
use crate::config::DEFAULT_PLACEHOLDER;
use crate::dataframe::{positional_columns, DataFrame, DataFrameKind};
use crate::error::ImpalaError;
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
pub trait DbApiHook: Send + Sync {
    /// Open a new connection.
    async fn get_conn(&self) -> Result<Box<dyn DbConnection>, ImpalaError>;

    /// Parameter placeholder used by [`DbApiHook::insert_rows`].
    fn placeholder(&self) -> &str {
        DEFAULT_PLACEHOLDER
    }

    /// Container built by [`DbApiHook::get_df`] when none is requested.
    fn default_dataframe_kind(&self) -> DataFrameKind {
        DataFrameKind::default()
    }

    /// Execute `sql` and return the first row, if any.
    async fn get_first(&self, sql: &str) -> Result<Option<Row>, ImpalaError> {
        let mut conn = self.get_conn().await?;
        let result = async {
            let mut cursor = conn.cursor().await?;
            debug!(sql, "Running statement");
            cursor.execute(sql, &[]).await?;
            Ok::<_, ImpalaError>(cursor.fetchone().await?)
        }
        .await;

        close_after(conn, result).await
    }

    /// Execute `sql` and return every row.
    async fn get_records(&self, sql: &str) -> Result<Vec<Row>, ImpalaError> {
        let mut conn = self.get_conn().await?;
        let result = async {
            let mut cursor = conn.cursor().await?;
            debug!(sql, "Running statement");
            cursor.execute(sql, &[]).await?;
            let rows = cursor.fetchall().await?;
            debug!(rows = rows.len(), rowcount = cursor.rowcount(), "Fetched records");
            Ok::<_, ImpalaError>(rows)
        }
        .await;

        close_after(conn, result).await
    }

    /// Execute `sql` and collect the result into a tabular container.
    ///
    /// `kind` falls back to [`DbApiHook::default_dataframe_kind`]. When the
    /// cursor reports no description, columns are named by position.
    async fn get_df(
        &self,
        sql: &str,
        kind: Option<DataFrameKind>,
    ) -> Result<DataFrame, ImpalaError> {
        let kind = kind.unwrap_or_else(|| self.default_dataframe_kind());
        let mut conn = self.get_conn().await?;
        let result = async {
            let mut cursor = conn.cursor().await?;
            debug!(sql, %kind, "Running statement into dataframe");
            cursor.execute(sql, &[]).await?;
            let description = cursor.description();
            let rows = cursor.fetchall().await?;

            let description = description
                .unwrap_or_else(|| positional_columns(rows.first().map_or(0, Vec::len)));
            Ok::<_, ImpalaError>(DataFrame::from_rows(kind, &description, rows)?)
        }
        .await;

        close_after(conn, result).await
    }

    /// Insert `rows` into `table`, one parameterized statement per row.
    ///
    /// Commits after every `commit_every` rows and once at the end; a
    /// `commit_every` of 0 commits only at the end. Returns the number of
    /// rows inserted.
    async fn insert_rows(
        &self,
        table: &str,
        rows: Vec<Row>,
        target_fields: Option<Vec<String>>,
        commit_every: usize,
    ) -> Result<usize, ImpalaError> {
        let mut conn = self.get_conn().await?;
        let result = async {
            let mut cursor = conn.cursor().await?;

            let mut inserted = 0;
            for row in rows {
                let sql = generate_insert_sql(
                    table,
                    row.len(),
                    target_fields.as_deref(),
                    self.placeholder(),
                );
                cursor.execute(&sql, &row).await?;
                inserted += 1;

                if commit_every > 0 && inserted % commit_every == 0 {
                    conn.commit().await?;
                    info!("Loaded {} rows into {} so far", inserted, table);
                }
            }

            conn.commit().await?;
            info!("Done loading. Loaded a total of {} rows into {}", inserted, table);
            Ok::<_, ImpalaError>(inserted)
        }
        .await;

        close_after(conn, result).await
    }
}

/// Close `conn` whatever `result` is. An error from the work itself wins
/// over an error from closing.
async fn close_after<T>(
    mut conn: Box<dyn DbConnection>,
    result: Result<T, ImpalaError>,
) -> Result<T, ImpalaError> {
    let closed = conn.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

/// Build `INSERT INTO table [(f1, f2)] VALUES (p,p)` for a row of `width` values.
pub fn generate_insert_sql(
    table: &str,
    width: usize,
    target_fields: Option<&[String]>,
    placeholder: &str,
) -> String {
    let placeholders = vec![placeholder; width].join(",");
    match target_fields {
        Some(fields) if !fields.is_empty() => format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            fields.join(", "),
            placeholders
        ),
        _ => format!("INSERT INTO {} VALUES ({})", table, placeholders),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_insert_sql_without_fields() {
        assert_eq!(
            generate_insert_sql("table", 1, None, "%s"),
            "INSERT INTO table VALUES (%s)"
        );
    }

    #[test]
    fn test_generate_insert_sql_with_fields() {
        let fields = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            generate_insert_sql("db.t", 2, Some(&fields), "?"),
            "INSERT INTO db.t (a, b) VALUES (?,?)"
        );
    }

    #[test]
    fn test_generate_insert_sql_empty_fields_ignored() {
        assert_eq!(
            generate_insert_sql("t", 2, Some(&[]), "%s"),
            "INSERT INTO t VALUES (%s,%s)"
        );
    }
}
