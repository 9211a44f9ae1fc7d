//! Storage layer: the read-only labeled tweet dataset, queried through DuckDB.

mod error;
pub use error::StoreError;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::TweetStore;
