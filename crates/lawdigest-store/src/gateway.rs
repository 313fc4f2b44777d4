//! The persistence seam between the pipeline and durable storage.

use std::collections::{BTreeSet, HashSet};

use lawdigest_core::{Category, NormalizedDocument, ProcessingPeriod, RankSlot};

use crate::StoreError;

/// Everything the persist stage writes for one period.
#[derive(Debug, Clone, Copy)]
pub struct PeriodWrite<'a> {
    pub period: ProcessingPeriod,
    pub documents: &'a [NormalizedDocument],
    pub slots: &'a [RankSlot],
    /// Delete the period's existing documents and slots first.
    pub replace_existing: bool,
}

impl PeriodWrite<'_> {
    /// Check the write is self-consistent before touching storage.
    ///
    /// Every record must belong to `period`, slot positions must be unique,
    /// and every slot must reference a document in this write.
    pub fn validate(&self) -> Result<(), StoreError> {
        for doc in self.documents {
            if doc.processing_period != self.period {
                return Err(StoreError::PeriodMismatch {
                    expected: self.period,
                    found: doc.processing_period,
                });
            }
        }
        let keys: HashSet<&str> = self.documents.iter().map(|d| d.law_key.as_str()).collect();
        let mut positions = HashSet::new();
        for slot in self.slots {
            if slot.processing_period != self.period {
                return Err(StoreError::PeriodMismatch {
                    expected: self.period,
                    found: slot.processing_period,
                });
            }
            if !positions.insert((slot.category, slot.rank)) {
                return Err(StoreError::DuplicateSlot {
                    category: slot.category,
                    rank: slot.rank,
                });
            }
            if !keys.contains(slot.law_key.as_str()) {
                return Err(StoreError::DanglingSlot {
                    category: slot.category,
                    rank: slot.rank,
                    law_key: slot.law_key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Categories whose rank slots this write replaces.
    pub fn categories(&self) -> BTreeSet<Category> {
        self.slots.iter().map(|s| s.category).collect()
    }
}

/// Row counts affected by one [`PeriodWrite`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub deleted_documents: usize,
    pub deleted_slots: usize,
    pub documents_written: usize,
    pub slots_written: usize,
}

/// Durable storage for period documents and rank slots.
///
/// `write_period` is all-or-nothing: on error the store holds exactly what it
/// held before the call.
pub trait PersistenceGateway {
    fn write_period(&mut self, write: &PeriodWrite<'_>) -> Result<WriteOutcome, StoreError>;

    fn document_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError>;

    fn rank_slot_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError>;

    /// Documents of a period ordered by law key.
    fn documents(&self, period: ProcessingPeriod) -> Result<Vec<NormalizedDocument>, StoreError>;

    /// Rank slots of a period ordered by category then rank.
    fn rank_slots(&self, period: ProcessingPeriod) -> Result<Vec<RankSlot>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    fn slot(category: Category, rank: u32, law_key: &str) -> RankSlot {
        RankSlot {
            processing_period: period(),
            category,
            rank,
            law_key: law_key.into(),
            priority_score: 50.0,
            score_breakdown: json!({}),
            category_scores: json!({}),
            impact_keywords: vec![],
        }
    }

    #[test]
    fn valid_write_passes() {
        let docs = vec![NormalizedDocument::new("a", "의료법", period())];
        let slots = vec![slot(Category::Health, 1, "a")];
        let write = PeriodWrite {
            period: period(),
            documents: &docs,
            slots: &slots,
            replace_existing: true,
        };
        write.validate().unwrap();
        assert_eq!(write.categories().into_iter().collect::<Vec<_>>(), vec![Category::Health]);
    }

    #[test]
    fn rejects_dangling_slot() {
        let docs = vec![NormalizedDocument::new("a", "의료법", period())];
        let slots = vec![slot(Category::Health, 1, "missing")];
        let write = PeriodWrite {
            period: period(),
            documents: &docs,
            slots: &slots,
            replace_existing: false,
        };
        assert!(matches!(write.validate(), Err(StoreError::DanglingSlot { .. })));
    }

    #[test]
    fn rejects_duplicate_position() {
        let docs = vec![
            NormalizedDocument::new("a", "의료법", period()),
            NormalizedDocument::new("b", "약사법", period()),
        ];
        let slots = vec![slot(Category::Health, 1, "a"), slot(Category::Health, 1, "b")];
        let write = PeriodWrite {
            period: period(),
            documents: &docs,
            slots: &slots,
            replace_existing: false,
        };
        assert!(matches!(
            write.validate(),
            Err(StoreError::DuplicateSlot { rank: 1, .. })
        ));
    }

    #[test]
    fn rejects_foreign_period() {
        let other = ProcessingPeriod::new(2024, 11).unwrap();
        let docs = vec![NormalizedDocument::new("a", "의료법", other)];
        let write = PeriodWrite {
            period: period(),
            documents: &docs,
            slots: &[],
            replace_existing: false,
        };
        assert!(matches!(
            write.validate(),
            Err(StoreError::PeriodMismatch { .. })
        ));
    }
}
