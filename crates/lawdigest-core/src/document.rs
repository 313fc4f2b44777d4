//! Period-scoped document and rank-slot records.

use serde::{Deserialize, Serialize};

use crate::{Category, ProcessingPeriod};

/// One legal-document record for one processing period.
///
/// Produced by the normalize stage from a single source content document and
/// never mutated afterwards. `(law_key, processing_period)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Natural key, stable across periods (법령키).
    pub law_key: String,
    pub law_id: Option<String>,
    pub name_korean: String,
    pub name_chinese: Option<String>,
    pub name_abbreviation: Option<String>,
    pub promulgation_number: Option<String>,
    /// Date string as published by the source.
    pub promulgation_date_str: Option<String>,
    /// ISO 8601 date, present when the source string parsed.
    pub promulgation_date: Option<String>,
    pub enforcement_date_str: Option<String>,
    pub enforcement_date: Option<String>,
    /// `enforcement_date - promulgation_date` in days, when both parsed.
    pub grace_period_days: Option<i64>,
    /// Amendment type (제개정구분), e.g. "일부개정".
    pub revision_type: Option<String>,
    /// Law type (법종구분), e.g. "법률", "대통령령".
    pub law_type: Option<String>,
    pub law_type_code: Option<String>,
    /// Administering department (소관부처).
    pub department: Option<String>,
    pub department_code: Option<String>,
    pub language: Option<String>,
    pub phone_number: Option<String>,
    pub chapter_section: Option<String>,
    pub is_promulgated_law: Option<String>,
    /// Amendment text (개정문내용), cleaned.
    pub revision_content: Option<String>,
    /// Amendment reason (제개정이유내용), cleaned.
    pub revision_reason: Option<String>,
    pub total_articles: Option<u32>,
    pub total_addenda: Option<u32>,
    pub processing_period: ProcessingPeriod,
}

impl NormalizedDocument {
    /// A record with only the identifying fields set.
    pub fn new(
        law_key: impl Into<String>,
        name_korean: impl Into<String>,
        processing_period: ProcessingPeriod,
    ) -> Self {
        Self {
            law_key: law_key.into(),
            law_id: None,
            name_korean: name_korean.into(),
            name_chinese: None,
            name_abbreviation: None,
            promulgation_number: None,
            promulgation_date_str: None,
            promulgation_date: None,
            enforcement_date_str: None,
            enforcement_date: None,
            grace_period_days: None,
            revision_type: None,
            law_type: None,
            law_type_code: None,
            department: None,
            department_code: None,
            language: None,
            phone_number: None,
            chapter_section: None,
            is_promulgated_law: None,
            revision_content: None,
            revision_reason: None,
            total_articles: None,
            total_addenda: None,
            processing_period,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.revision_reason = Some(reason.into());
        self
    }

    pub fn with_law_type(mut self, law_type: impl Into<String>) -> Self {
        self.law_type = Some(law_type.into());
        self
    }

    pub fn with_revision_type(mut self, revision_type: impl Into<String>) -> Self {
        self.revision_type = Some(revision_type.into());
        self
    }

    pub fn department(&self) -> &str {
        self.department.as_deref().unwrap_or_default()
    }

    pub fn reason(&self) -> &str {
        self.revision_reason.as_deref().unwrap_or_default()
    }

    /// Name and amendment reason joined by a space: the text every
    /// category scorer searches.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name_korean, self.reason())
    }
}

/// One persisted `(period, category, rank)` position.
///
/// Rank slots reference their document by natural key and are replaced
/// wholesale whenever their period is reprocessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSlot {
    pub processing_period: ProcessingPeriod,
    pub category: Category,
    /// 1-based position within the category.
    pub rank: u32,
    pub law_key: String,
    pub priority_score: f64,
    /// Scorer output: keyword, tier, multiplier, and category extras.
    pub score_breakdown: serde_json::Value,
    /// Classifier score for every category, keyed by code.
    pub category_scores: serde_json::Value,
    pub impact_keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    #[test]
    fn search_text_joins_name_and_reason() {
        let doc = NormalizedDocument::new("001", "의료법", period()).with_reason("응급의료 확대");
        assert_eq!(doc.search_text(), "의료법 응급의료 확대");
    }

    #[test]
    fn absent_fields_read_as_empty() {
        let doc = NormalizedDocument::new("001", "의료법", period());
        assert_eq!(doc.department(), "");
        assert_eq!(doc.reason(), "");
        assert_eq!(doc.search_text(), "의료법 ");
    }

    #[test]
    fn document_json_roundtrip() {
        let doc = NormalizedDocument::new("009876", "근로기준법", period())
            .with_department("고용노동부")
            .with_law_type("법률");
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: NormalizedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
        assert!(json.contains("\"processing_period\":\"2024-12\""));
    }
}
