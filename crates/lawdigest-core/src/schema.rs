//! Arrow schema definitions for the persisted lawdigest tables.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::{NormalizedDocument, RankSlot};

/// Schema for period-tagged documents (`law_data`), summary columns only.
pub fn law_data_schema() -> Schema {
    Schema::new(vec![
        Field::new("law_key", DataType::Utf8, false),
        Field::new("processing_month", DataType::Utf8, false),
        Field::new("law_name_korean", DataType::Utf8, false),
        Field::new("department", DataType::Utf8, true),
        Field::new("law_type", DataType::Utf8, true),
        Field::new("revision_type", DataType::Utf8, true),
        Field::new("promulgation_date", DataType::Utf8, true),
        Field::new("enforcement_date", DataType::Utf8, true),
        Field::new("grace_period_days", DataType::Int64, true),
    ])
}

/// Schema for ranked category slots (`processed_law`).
pub fn rank_slot_schema() -> Schema {
    Schema::new(vec![
        Field::new("processing_month", DataType::Utf8, false),
        Field::new("category_code", DataType::Utf8, false),
        Field::new("category_rank", DataType::UInt32, false),
        Field::new("law_key", DataType::Utf8, false),
        Field::new("priority_score", DataType::Float64, false),
        Field::new("primary_keyword", DataType::Utf8, true),
        Field::new("impact_keywords", DataType::Utf8, false),
    ])
}

/// Build a `law_data` batch from documents, in the given order.
pub fn documents_batch(docs: &[NormalizedDocument]) -> Result<RecordBatch, ArrowError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(docs.iter().map(|d| d.law_key.as_str()))),
        Arc::new(StringArray::from_iter_values(
            docs.iter().map(|d| d.processing_period.to_string()),
        )),
        Arc::new(StringArray::from_iter_values(docs.iter().map(|d| d.name_korean.as_str()))),
        Arc::new(StringArray::from_iter(docs.iter().map(|d| d.department.as_deref()))),
        Arc::new(StringArray::from_iter(docs.iter().map(|d| d.law_type.as_deref()))),
        Arc::new(StringArray::from_iter(docs.iter().map(|d| d.revision_type.as_deref()))),
        Arc::new(StringArray::from_iter(docs.iter().map(|d| d.promulgation_date.as_deref()))),
        Arc::new(StringArray::from_iter(docs.iter().map(|d| d.enforcement_date.as_deref()))),
        Arc::new(Int64Array::from_iter(docs.iter().map(|d| d.grace_period_days))),
    ];
    RecordBatch::try_new(Arc::new(law_data_schema()), columns)
}

/// Build a `processed_law` batch from rank slots, in the given order.
///
/// Impact keywords are flattened to a comma-separated string.
pub fn rank_slots_batch(slots: &[RankSlot]) -> Result<RecordBatch, ArrowError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            slots.iter().map(|s| s.processing_period.to_string()),
        )),
        Arc::new(StringArray::from_iter_values(slots.iter().map(|s| s.category.code()))),
        Arc::new(UInt32Array::from_iter_values(slots.iter().map(|s| s.rank))),
        Arc::new(StringArray::from_iter_values(slots.iter().map(|s| s.law_key.as_str()))),
        Arc::new(Float64Array::from_iter_values(slots.iter().map(|s| s.priority_score))),
        Arc::new(StringArray::from_iter(slots.iter().map(|s| {
            s.score_breakdown
                .get("primary_keyword")
                .and_then(|v| v.as_str())
        }))),
        Arc::new(StringArray::from_iter_values(
            slots.iter().map(|s| s.impact_keywords.join(",")),
        )),
    ];
    RecordBatch::try_new(Arc::new(rank_slot_schema()), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ProcessingPeriod};
    use arrow::array::Array;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    #[test]
    fn law_data_schema_has_expected_fields() {
        let schema = law_data_schema();
        assert_eq!(schema.fields().len(), 9);
        assert!(schema.field_with_name("law_key").is_ok());
        assert!(schema.field_with_name("grace_period_days").is_ok());
    }

    #[test]
    fn rank_slot_schema_has_expected_fields() {
        let schema = rank_slot_schema();
        assert_eq!(schema.fields().len(), 7);
        assert!(schema.field_with_name("category_rank").is_ok());
        assert!(!schema.field_with_name("priority_score").unwrap().is_nullable());
    }

    #[test]
    fn documents_batch_keeps_nulls() {
        let mut doc = NormalizedDocument::new("001", "의료법", period()).with_department("보건복지부");
        doc.grace_period_days = Some(90);
        let bare = NormalizedDocument::new("002", "민법", period());

        let batch = documents_batch(&[doc, bare]).unwrap();
        assert_eq!(batch.num_rows(), 2);
        let dept = batch
            .column_by_name("department")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(dept.value(0), "보건복지부");
        assert!(dept.is_null(1));
    }

    #[test]
    fn rank_slots_batch_flattens_keywords() {
        let slot = RankSlot {
            processing_period: period(),
            category: Category::Labor,
            rank: 1,
            law_key: "007".into(),
            priority_score: 100.0,
            score_breakdown: serde_json::json!({"primary_keyword": "최저임금"}),
            category_scores: serde_json::json!({"LABOR": 6}),
            impact_keywords: vec!["확대".into(), "지원".into()],
        };
        let batch = rank_slots_batch(&[slot]).unwrap();
        assert_eq!(batch.num_rows(), 1);

        let keyword = batch
            .column_by_name("primary_keyword")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(keyword.value(0), "최저임금");

        let impact = batch
            .column_by_name("impact_keywords")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(impact.value(0), "확대,지원");
    }
}
