use lawdigest_core::PeriodError;
use lawdigest_store::StoreError;
use thiserror::Error;

use crate::payload::PipelineState;
use crate::source::SourceError;
use crate::stage::Stage;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage result failed validation; the run halts here.
    #[error("{stage} stage failed: {message}")]
    Stage { stage: Stage, message: String },

    #[error("cannot move from {from} to {to}")]
    OutOfOrder {
        from: PipelineState,
        to: PipelineState,
    },

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("period error: {0}")]
    Period(#[from] PeriodError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn stage(stage: Stage, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }
}
