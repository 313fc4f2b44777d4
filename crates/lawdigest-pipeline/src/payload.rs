//! The immutable period payload and the linear run state machine.

use std::fmt;

use lawdigest_core::{PeriodError, ProcessingPeriod};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PipelineError;

/// Period every stage of one run operates on.
///
/// Built once when the run is prepared and handed unchanged to each stage,
/// so a run that crosses midnight at month end still processes one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePayload {
    pub year: i32,
    pub month: u32,
    pub month_str: ProcessingPeriod,
}

impl PipelinePayload {
    pub fn from_period(period: ProcessingPeriod) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            month_str: period,
        }
    }

    /// Use `year`/`month` when both are given, else the current local month.
    pub fn prepare(year: Option<i32>, month: Option<u32>) -> Result<Self, PeriodError> {
        let period = match (year, month) {
            (Some(y), Some(m)) => ProcessingPeriod::new(y, m)?,
            _ => ProcessingPeriod::current(),
        };
        info!(%period, "pipeline payload prepared");
        Ok(Self::from_period(period))
    }

    pub fn period(&self) -> ProcessingPeriod {
        self.month_str
    }
}

/// Run progress. Strictly linear: each state has exactly one successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Prepared,
    ListCollected,
    ContentCollected,
    Normalized,
    Persisted,
    Finalized,
}

impl PipelineState {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Prepared => Some(Self::ListCollected),
            Self::ListCollected => Some(Self::ContentCollected),
            Self::ContentCollected => Some(Self::Normalized),
            Self::Normalized => Some(Self::Persisted),
            Self::Persisted => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }

    /// Move to `to`, which must be the immediate successor.
    pub fn advance(&mut self, to: Self) -> Result<(), PipelineError> {
        if self.next() != Some(to) {
            return Err(PipelineError::OutOfOrder { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepared => "prepared",
            Self::ListCollected => "list_collected",
            Self::ContentCollected => "content_collected",
            Self::Normalized => "normalized",
            Self::Persisted => "persisted",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_year_month() {
        let p = PipelinePayload::prepare(Some(2024), Some(3)).unwrap();
        assert_eq!(p.year, 2024);
        assert_eq!(p.month, 3);
        assert_eq!(p.month_str.to_string(), "2024-03");
    }

    #[test]
    fn partial_input_uses_current_month() {
        let now = ProcessingPeriod::current();
        assert_eq!(PipelinePayload::prepare(Some(2024), None).unwrap().period(), now);
        assert_eq!(PipelinePayload::prepare(None, None).unwrap().period(), now);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(PipelinePayload::prepare(Some(2024), Some(13)).is_err());
    }

    #[test]
    fn payload_json_shape() {
        let p = PipelinePayload::prepare(Some(2024), Some(12)).unwrap();
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json, serde_json::json!({"year": 2024, "month": 12, "month_str": "2024-12"}));
    }

    #[test]
    fn states_advance_linearly() {
        let mut state = PipelineState::Prepared;
        let order = [
            PipelineState::ListCollected,
            PipelineState::ContentCollected,
            PipelineState::Normalized,
            PipelineState::Persisted,
            PipelineState::Finalized,
        ];
        for to in order {
            state.advance(to).unwrap();
        }
        assert_eq!(state, PipelineState::Finalized);
        assert_eq!(state.next(), None);
    }

    #[test]
    fn skipping_a_state_fails() {
        let mut state = PipelineState::Prepared;
        let err = state.advance(PipelineState::Normalized).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder { .. }));
        assert_eq!(state, PipelineState::Prepared);
        assert_eq!(err.to_string(), "cannot move from prepared to normalized");
    }
}
