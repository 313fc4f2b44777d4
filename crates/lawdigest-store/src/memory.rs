//! In-process gateway, used when no database path is configured and in tests.

use std::collections::BTreeMap;

use lawdigest_core::{Category, NormalizedDocument, ProcessingPeriod, RankSlot};
use tracing::info;

use crate::StoreError;
use crate::gateway::{PeriodWrite, PersistenceGateway, WriteOutcome};

#[derive(Debug, Clone, Default)]
struct Tables {
    documents: BTreeMap<(ProcessingPeriod, String), NormalizedDocument>,
    slots: BTreeMap<(ProcessingPeriod, Category, u32), RankSlot>,
}

/// Gateway holding everything in ordered maps.
///
/// Writes are applied to a copy of the tables which replaces the live copy
/// only once every step has succeeded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Periods with at least one stored document.
    pub fn periods(&self) -> Vec<ProcessingPeriod> {
        let mut periods: Vec<ProcessingPeriod> =
            self.tables.documents.keys().map(|(p, _)| *p).collect();
        periods.dedup();
        periods
    }
}

impl PersistenceGateway for MemoryStore {
    fn write_period(&mut self, write: &PeriodWrite<'_>) -> Result<WriteOutcome, StoreError> {
        write.validate()?;
        let period = write.period;
        let mut next = self.tables.clone();
        let mut outcome = WriteOutcome::default();

        if write.replace_existing {
            let before = next.slots.len();
            next.slots.retain(|(p, _, _), _| *p != period);
            outcome.deleted_slots = before - next.slots.len();

            let before = next.documents.len();
            next.documents.retain(|(p, _), _| *p != period);
            outcome.deleted_documents = before - next.documents.len();
        }

        for doc in write.documents {
            next.documents
                .insert((period, doc.law_key.clone()), doc.clone());
            outcome.documents_written += 1;
        }

        for category in write.categories() {
            next.slots
                .retain(|(p, c, _), _| !(*p == period && *c == category));
        }
        for slot in write.slots {
            next.slots
                .insert((period, slot.category, slot.rank), slot.clone());
            outcome.slots_written += 1;
        }

        self.tables = next;
        info!(
            %period,
            deleted = outcome.deleted_documents,
            documents = outcome.documents_written,
            slots = outcome.slots_written,
            "wrote period to memory store"
        );
        Ok(outcome)
    }

    fn document_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError> {
        Ok(self
            .tables
            .documents
            .keys()
            .filter(|(p, _)| *p == period)
            .count())
    }

    fn rank_slot_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError> {
        Ok(self
            .tables
            .slots
            .keys()
            .filter(|(p, _, _)| *p == period)
            .count())
    }

    fn documents(&self, period: ProcessingPeriod) -> Result<Vec<NormalizedDocument>, StoreError> {
        Ok(self
            .tables
            .documents
            .iter()
            .filter(|((p, _), _)| *p == period)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn rank_slots(&self, period: ProcessingPeriod) -> Result<Vec<RankSlot>, StoreError> {
        Ok(self
            .tables
            .slots
            .iter()
            .filter(|((p, _, _), _)| *p == period)
            .map(|(_, slot)| slot.clone())
            .collect())
    }
}
