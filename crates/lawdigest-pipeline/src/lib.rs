//! Monthly pipeline: the stage contract, sources, and the run driver.

mod error;
pub use error::PipelineError;

pub mod payload;
pub mod runner;
pub mod source;
pub mod stage;

#[cfg(feature = "http")]
pub mod http;

pub use payload::{PipelinePayload, PipelineState};
pub use runner::{PipelineConfig, PipelineRun, RunReport, normalize_contents};
pub use source::{DirSource, FetchTally, LawListing, LawSource, SourceError, fetch_contents};
pub use stage::{Stage, StageEnvelope, validate_previous};

#[cfg(feature = "http")]
pub use http::HttpSource;
