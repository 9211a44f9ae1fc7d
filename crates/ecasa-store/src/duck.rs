//! DuckDB storage for the labeled training tweets.

use std::path::Path;

use arrow::array::Int64Array;
use arrow::record_batch::RecordBatch;
use duckdb::Connection;
use ecasa_core::tweets::{MESSAGE, SENTIMENT, TABLE, TWEET_ID};
use tracing::info;

use crate::StoreError;

/// In-memory DuckDB holding the `tweets` table.
///
/// The dataset is imported once at startup from CSV or Parquet and only read
/// afterwards. Columns are normalized on import to
/// [`tweets_schema`](ecasa_core::tweets::tweets_schema): `sentiment BIGINT`,
/// `message VARCHAR`, `tweetid BIGINT` (null when the source has no ids).
pub struct TweetStore {
    conn: Connection,
}

impl TweetStore {
    /// Open an empty in-memory database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Check whether the `tweets` table has been loaded.
    pub fn has_tweets(&self) -> bool {
        self.tweet_count().is_ok()
    }

    /// Import a `.csv` or `.parquet` file into the `tweets` table.
    pub fn load_tweets(&self, path: &Path) -> Result<usize, StoreError> {
        if !path.exists() {
            return Err(StoreError::DatasetNotFound(path.to_path_buf()));
        }
        let source = source_expr(path)?;

        let columns = self.source_columns(&source)?;
        for required in [SENTIMENT, MESSAGE] {
            if !columns.iter().any(|c| c == required) {
                return Err(StoreError::MissingColumn(required));
            }
        }
        let tweet_id = if columns.iter().any(|c| c == TWEET_ID) {
            format!("TRY_CAST({TWEET_ID} AS BIGINT)")
        } else {
            "NULL::BIGINT".to_string()
        };

        let sql = format!(
            "CREATE OR REPLACE TABLE {TABLE} AS
             SELECT CAST({SENTIMENT} AS BIGINT) AS {SENTIMENT},
                    CAST({MESSAGE} AS VARCHAR) AS {MESSAGE},
                    {tweet_id} AS {TWEET_ID}
             FROM {source}"
        );
        self.conn.execute_batch(&sql)?;

        let count = self.tweet_count()?;
        info!(count, path = %path.display(), "loaded tweets table");
        Ok(count)
    }

    fn source_columns(&self, source: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {source} LIMIT 0"))?;
        let schema = stmt.query_arrow([])?.get_schema();
        Ok(schema.fields().iter().map(|f| f.name().to_string()).collect())
    }

    /// Number of rows in the `tweets` table.
    pub fn tweet_count(&self) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {TABLE}");
        let batches = self.query_arrow(&sql)?;
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    /// First `limit` tweets with their labels, in file order.
    pub fn sample(&self, limit: usize) -> Result<Vec<RecordBatch>, StoreError> {
        let sql = format!("SELECT {SENTIMENT}, {MESSAGE} FROM {TABLE} LIMIT {limit}");
        self.query_arrow(&sql)
    }

    /// `(class code, row count)` pairs ordered by class code.
    pub fn sentiment_distribution(&self) -> Result<Vec<(i64, usize)>, StoreError> {
        let sql = format!(
            "SELECT {SENTIMENT}, count(*)::BIGINT AS cnt FROM {TABLE}
             GROUP BY {SENTIMENT} ORDER BY {SENTIMENT}"
        );
        let mut out = Vec::new();
        for batch in self.query_arrow(&sql)? {
            let codes = int64_column(&batch, 0)?;
            let counts = int64_column(&batch, 1)?;
            for row in 0..batch.num_rows() {
                out.push((codes.value(row), counts.value(row) as usize));
            }
        }
        Ok(out)
    }

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }
}

/// DuckDB table function reading the dataset file.
fn source_expr(path: &Path) -> Result<String, StoreError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let quoted = path.display().to_string().replace('\'', "''");
    match ext.as_deref() {
        Some("csv") => Ok(format!("read_csv_auto('{quoted}', header = true)")),
        Some("parquet") => Ok(format!("read_parquet('{quoted}')")),
        _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn int64_column(batch: &RecordBatch, idx: usize) -> Result<&Int64Array, StoreError> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| StoreError::Other(format!("column {idx} not i64")))
}
