use lawdigest_core::{Category, ProcessingPeriod};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no results for query")]
    NoResults,

    #[error("record for period {found} in a write for period {expected}")]
    PeriodMismatch {
        expected: ProcessingPeriod,
        found: ProcessingPeriod,
    },

    #[error("rank slot {category} #{rank} references unknown document {law_key}")]
    DanglingSlot {
        category: Category,
        rank: u32,
        law_key: String,
    },

    #[error("duplicate rank slot {category} #{rank}")]
    DuplicateSlot { category: Category, rank: u32 },

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
