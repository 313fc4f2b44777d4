//! The run driver: prepare → list → content → normalize → persist → finalize.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use lawdigest_core::{NormalizedDocument, ProcessingPeriod, normalize_document};
use lawdigest_rank::{category_counts, rank_and_select, score_all, to_rank_slots};
use lawdigest_store::{PeriodWrite, PersistenceGateway};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::PipelineError;
use crate::payload::{PipelinePayload, PipelineState};
use crate::source::{LawListing, LawSource, fetch_contents};
use crate::stage::{
    ContentSummary, ListSummary, NormalizeSummary, PersistSummary, STATUS_NOT_FOUND,
    StageEnvelope, validate_previous,
};

/// Run tunables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rank slots kept per category.
    pub top_k: usize,
    /// Concurrent content requests.
    pub workers: usize,
    /// Delete the period's stored data before writing.
    pub replace_existing: bool,
    /// Pause between listing pages of the HTTP source.
    pub request_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: lawdigest_rank::DEFAULT_TOP_K,
            workers: 3,
            replace_existing: true,
            request_delay: Duration::from_millis(100),
        }
    }
}

/// Final outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub period: ProcessingPeriod,
    pub listed: usize,
    pub fetched: usize,
    pub fetch_errors: usize,
    pub normalized: usize,
    pub normalize_failures: usize,
    pub duplicates: usize,
    pub deleted: usize,
    pub documents_written: usize,
    pub slots_written: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub categories_populated: usize,
    pub duration_ms: u64,
}

/// Normalize content documents in order, dropping failures and repeated keys.
pub fn normalize_contents(
    contents: &[Value],
    period: ProcessingPeriod,
) -> (Vec<NormalizedDocument>, NormalizeSummary) {
    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(contents.len());
    let mut failure_count = 0;
    let mut duplicate_count = 0;

    for (index, raw) in contents.iter().enumerate() {
        match normalize_document(raw, period) {
            Ok(doc) => {
                if seen.insert(doc.law_key.clone()) {
                    documents.push(doc);
                } else {
                    warn!(law_key = %doc.law_key, "duplicate law key in period, keeping first");
                    duplicate_count += 1;
                }
            }
            Err(e) => {
                warn!(index, error = %e, "failed to normalize content document");
                failure_count += 1;
            }
        }
    }

    let summary = NormalizeSummary {
        success: true,
        total_files: contents.len(),
        total_records: documents.len(),
        success_count: documents.len() + duplicate_count,
        failure_count,
        duplicate_count,
    };
    (documents, summary)
}

/// One pipeline run over a single period.
///
/// Stage methods must be called in order; each validates the previous
/// stage's envelope before doing any work.
pub struct PipelineRun<'a> {
    payload: PipelinePayload,
    config: PipelineConfig,
    source: &'a dyn LawSource,
    store: &'a mut dyn PersistenceGateway,
    state: PipelineState,
    started: Instant,
    last: Option<StageEnvelope>,
    listings: Vec<LawListing>,
    contents: Vec<Value>,
    documents: Vec<NormalizedDocument>,
    list_summary: Option<ListSummary>,
    content_summary: Option<ContentSummary>,
    normalize_summary: Option<NormalizeSummary>,
}

impl<'a> PipelineRun<'a> {
    pub fn new(
        payload: PipelinePayload,
        config: PipelineConfig,
        source: &'a dyn LawSource,
        store: &'a mut dyn PersistenceGateway,
    ) -> Self {
        Self {
            payload,
            config,
            source,
            store,
            state: PipelineState::Prepared,
            started: Instant::now(),
            last: None,
            listings: Vec::new(),
            contents: Vec::new(),
            documents: Vec::new(),
            list_summary: None,
            content_summary: None,
            normalize_summary: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn period(&self) -> ProcessingPeriod {
        self.payload.period()
    }

    /// Run every stage in order.
    pub async fn run(mut self) -> Result<RunReport, PipelineError> {
        self.collect_list().await?;
        self.collect_contents().await?;
        self.normalize()?;
        self.persist()?;
        self.finalize()
    }

    pub async fn collect_list(&mut self) -> Result<&StageEnvelope, PipelineError> {
        if self.state != PipelineState::Prepared {
            return Err(PipelineError::OutOfOrder {
                from: self.state,
                to: PipelineState::ListCollected,
            });
        }
        let period = self.period();
        self.listings = self.source.list(period).await?;
        let summary = ListSummary {
            success: true,
            month_str: period,
            total_count: self.listings.len(),
        };
        info!(%period, total = summary.total_count, "list stage complete");
        let envelope = StageEnvelope::ok(&summary)?;
        self.list_summary = Some(summary);
        self.finish(PipelineState::ListCollected, envelope)
    }

    pub async fn collect_contents(&mut self) -> Result<&StageEnvelope, PipelineError> {
        validate_previous::<ListSummary>(self.last.as_ref())?;
        let fetched = fetch_contents(self.source, &self.listings, self.config.workers).await;
        self.contents = fetched.documents;
        let summary = ContentSummary {
            success: true,
            total_laws: self.listings.len(),
            success_count: fetched.tally.success_count,
            error_count: fetched.tally.error_count,
        };
        info!(
            total = summary.total_laws,
            success = summary.success_count,
            errors = summary.error_count,
            "content stage complete"
        );
        let envelope = StageEnvelope::ok(&summary)?;
        self.content_summary = Some(summary);
        self.finish(PipelineState::ContentCollected, envelope)
    }

    pub fn normalize(&mut self) -> Result<&StageEnvelope, PipelineError> {
        validate_previous::<ContentSummary>(self.last.as_ref())?;
        let (documents, summary) = normalize_contents(&self.contents, self.period());
        self.documents = documents;
        info!(
            records = summary.total_records,
            failures = summary.failure_count,
            duplicates = summary.duplicate_count,
            "normalize stage complete"
        );
        let envelope = StageEnvelope::ok(&summary)?;
        self.normalize_summary = Some(summary);
        self.finish(PipelineState::Normalized, envelope)
    }

    /// Classify, score, rank and write the period in one gateway call.
    ///
    /// With no documents nothing is written and the envelope carries 404.
    pub fn persist(&mut self) -> Result<&StageEnvelope, PipelineError> {
        validate_previous::<NormalizeSummary>(self.last.as_ref())?;
        let period = self.period();
        let started = Instant::now();

        if self.documents.is_empty() {
            warn!(%period, "no documents to persist");
            let summary = PersistSummary {
                success: false,
                deleted_count: 0,
                inserted_count: 0,
                slots_written: 0,
                category_counts: BTreeMap::new(),
                duration_ms: 0,
                message: Some(format!("no documents for {period}")),
            };
            let envelope = StageEnvelope::with_status(STATUS_NOT_FOUND, &summary)?;
            return self.finish(PipelineState::Persisted, envelope);
        }

        let scored = score_all(&self.documents);
        let counts = category_counts(&scored);
        let ranking = rank_and_select(&scored, self.config.top_k);
        let slots = to_rank_slots(&ranking, period);

        let outcome = self.store.write_period(&PeriodWrite {
            period,
            documents: &self.documents,
            slots: &slots,
            replace_existing: self.config.replace_existing,
        })?;

        let summary = PersistSummary {
            success: true,
            deleted_count: outcome.deleted_documents,
            inserted_count: outcome.documents_written,
            slots_written: outcome.slots_written,
            category_counts: counts
                .iter()
                .map(|(c, n)| (c.code().to_string(), *n))
                .collect(),
            duration_ms: started.elapsed().as_millis() as u64,
            message: None,
        };
        info!(
            %period,
            deleted = summary.deleted_count,
            inserted = summary.inserted_count,
            slots = summary.slots_written,
            "persist stage complete"
        );
        let envelope = StageEnvelope::ok(&summary)?;
        self.finish(PipelineState::Persisted, envelope)
    }

    pub fn finalize(&mut self) -> Result<RunReport, PipelineError> {
        let persisted = validate_previous::<PersistSummary>(self.last.as_ref())?;
        self.state.advance(PipelineState::Finalized)?;

        let listed = self.list_summary.as_ref().map_or(0, |s| s.total_count);
        let (fetched, fetch_errors) = self
            .content_summary
            .as_ref()
            .map_or((0, 0), |s| (s.success_count, s.error_count));
        let (normalized, normalize_failures, duplicates) = self
            .normalize_summary
            .as_ref()
            .map_or((0, 0, 0), |s| (s.total_records, s.failure_count, s.duplicate_count));

        let report = RunReport {
            period: self.period(),
            listed,
            fetched,
            fetch_errors,
            normalized,
            normalize_failures,
            duplicates,
            deleted: persisted.deleted_count,
            documents_written: persisted.inserted_count,
            slots_written: persisted.slots_written,
            categories_populated: persisted.category_counts.len(),
            category_counts: persisted.category_counts,
            duration_ms: self.started.elapsed().as_millis() as u64,
        };
        info!(
            period = %report.period,
            listed = report.listed,
            normalized = report.normalized,
            written = report.documents_written,
            slots = report.slots_written,
            "pipeline finalized"
        );
        Ok(report)
    }

    fn finish(
        &mut self,
        to: PipelineState,
        envelope: StageEnvelope,
    ) -> Result<&StageEnvelope, PipelineError> {
        self.state.advance(to)?;
        Ok(self.last.insert(envelope))
    }
}
