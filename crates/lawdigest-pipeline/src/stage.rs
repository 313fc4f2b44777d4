//! Stage result envelopes and the fail-closed check between stages.
//!
//! Every stage reports `{stage, status_code, body}`. The next stage refuses
//! to start unless the previous envelope exists, carries status 200, and its
//! body parses into the expected summary with `success == true`.

use std::collections::BTreeMap;
use std::fmt;

use lawdigest_core::ProcessingPeriod;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PipelineError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    List,
    Content,
    Normalize,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Content => "content",
            Self::Normalize => "normalize",
            Self::Persist => "persist",
        })
    }
}

/// One stage's reported result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEnvelope {
    pub stage: Stage,
    pub status_code: u16,
    pub body: Value,
}

impl StageEnvelope {
    pub fn ok<T: StageSummary>(summary: &T) -> Result<Self, serde_json::Error> {
        Self::with_status(STATUS_OK, summary)
    }

    pub fn with_status<T: StageSummary>(
        status_code: u16,
        summary: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            stage: T::STAGE,
            status_code,
            body: serde_json::to_value(summary)?,
        })
    }
}

/// Typed body of a [`StageEnvelope`].
pub trait StageSummary: Serialize + DeserializeOwned {
    const STAGE: Stage;

    fn success(&self) -> bool;
}

/// Check the previous stage's envelope and extract its summary.
pub fn validate_previous<T: StageSummary>(
    envelope: Option<&StageEnvelope>,
) -> Result<T, PipelineError> {
    let stage = T::STAGE;
    let envelope =
        envelope.ok_or_else(|| PipelineError::stage(stage, "no result from previous stage"))?;
    if envelope.stage != stage {
        return Err(PipelineError::stage(
            stage,
            format!("expected {stage} result, got {}", envelope.stage),
        ));
    }
    if envelope.status_code != STATUS_OK {
        return Err(PipelineError::stage(
            stage,
            format!("status {}: {}", envelope.status_code, envelope.body),
        ));
    }
    let summary: T = serde_json::from_value(envelope.body.clone())
        .map_err(|e| PipelineError::stage(stage, format!("malformed body: {e}")))?;
    if !summary.success() {
        return Err(PipelineError::stage(stage, "stage reported failure"));
    }
    Ok(summary)
}

// ── Summaries ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    pub success: bool,
    pub month_str: ProcessingPeriod,
    pub total_count: usize,
}

impl StageSummary for ListSummary {
    const STAGE: Stage = Stage::List;

    fn success(&self) -> bool {
        self.success
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub success: bool,
    pub total_laws: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl StageSummary for ContentSummary {
    const STAGE: Stage = Stage::Content;

    fn success(&self) -> bool {
        self.success
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    pub success: bool,
    pub total_files: usize,
    pub total_records: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub duplicate_count: usize,
}

impl StageSummary for NormalizeSummary {
    const STAGE: Stage = Stage::Normalize;

    fn success(&self) -> bool {
        self.success
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistSummary {
    pub success: bool,
    pub deleted_count: usize,
    pub inserted_count: usize,
    pub slots_written: usize,
    /// Scored documents per category code, before top-K truncation.
    pub category_counts: BTreeMap<String, usize>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageSummary for PersistSummary {
    const STAGE: Stage = Stage::Persist;

    fn success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(success: bool) -> ContentSummary {
        ContentSummary {
            success,
            total_laws: 3,
            success_count: 2,
            error_count: 1,
        }
    }

    #[test]
    fn valid_envelope_yields_summary() {
        let env = StageEnvelope::ok(&content(true)).unwrap();
        assert_eq!(env.stage, Stage::Content);
        let summary: ContentSummary = validate_previous(Some(&env)).unwrap();
        assert_eq!(summary, content(true));
    }

    #[test]
    fn missing_envelope_fails() {
        let err = validate_previous::<ContentSummary>(None).unwrap_err();
        assert!(matches!(err, PipelineError::Stage { stage: Stage::Content, .. }));
    }

    #[test]
    fn non_ok_status_fails() {
        let env = StageEnvelope::with_status(STATUS_NOT_FOUND, &content(true)).unwrap();
        let err = validate_previous::<ContentSummary>(Some(&env)).unwrap_err();
        assert!(err.to_string().contains("status 404"));
    }

    #[test]
    fn malformed_body_fails() {
        let env = StageEnvelope {
            stage: Stage::Content,
            status_code: STATUS_OK,
            body: json!({"total_laws": "many"}),
        };
        let err = validate_previous::<ContentSummary>(Some(&env)).unwrap_err();
        assert!(err.to_string().contains("malformed body"));
    }

    #[test]
    fn reported_failure_fails() {
        let env = StageEnvelope::ok(&content(false)).unwrap();
        assert!(validate_previous::<ContentSummary>(Some(&env)).is_err());
    }

    #[test]
    fn wrong_stage_fails() {
        let env = StageEnvelope::ok(&content(true)).unwrap();
        assert!(validate_previous::<NormalizeSummary>(Some(&env)).is_err());
    }

    #[test]
    fn envelope_json_shape() {
        let env = StageEnvelope::ok(&content(true)).unwrap();
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["stage"], "content");
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["body"]["error_count"], 1);
    }
}
