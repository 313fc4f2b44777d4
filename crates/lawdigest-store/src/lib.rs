//! Storage layer: the persistence gateway, an in-memory store and DuckDB.

mod error;
pub use error::StoreError;

pub mod gateway;
pub use gateway::{PeriodWrite, PersistenceGateway, WriteOutcome};

mod memory;
pub use memory::MemoryStore;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
