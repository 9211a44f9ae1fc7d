use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset not found: {0}")]
    DatasetNotFound(std::path::PathBuf),

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(std::path::PathBuf),

    #[error("dataset is missing column {0:?}")]
    MissingColumn(&'static str),

    #[error("no results for query")]
    NoResults,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("{0}")]
    Other(String),
}
