//! Per-category ordering and top-K selection for one processing period.

use std::collections::BTreeMap;

use lawdigest_core::{Category, NormalizedDocument, ProcessingPeriod, RankSlot};

use crate::classifier::{CategoryAssignment, classify};
use crate::impact::extract_impact_keywords;
use crate::scorer::{PriorityScore, score};

/// Slots kept per category per period.
pub const DEFAULT_TOP_K: usize = 5;

/// A document with its classification, score and impact keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument<'d> {
    pub document: &'d NormalizedDocument,
    pub assignment: CategoryAssignment,
    pub priority: PriorityScore,
    pub impact_keywords: Vec<String>,
}

impl<'d> ScoredDocument<'d> {
    pub fn evaluate(document: &'d NormalizedDocument) -> Self {
        let assignment = classify(document);
        let priority = score(document, assignment.category);
        Self {
            document,
            impact_keywords: extract_impact_keywords(document),
            assignment,
            priority,
        }
    }

    pub fn category(&self) -> Category {
        self.assignment.category
    }
}

/// Classify and score every document, preserving input order.
pub fn score_all(documents: &[NormalizedDocument]) -> Vec<ScoredDocument<'_>> {
    documents.iter().map(ScoredDocument::evaluate).collect()
}

/// Category → top-`k` documents, best first.
pub type Ranking<'s, 'd> = BTreeMap<Category, Vec<&'s ScoredDocument<'d>>>;

/// Group by category, order by score descending, keep the first `k`.
///
/// Equal scores keep input order. Categories absent from the input are absent
/// from the result.
pub fn rank_and_select<'s, 'd>(scored: &'s [ScoredDocument<'d>], k: usize) -> Ranking<'s, 'd> {
    let mut ranking: Ranking<'s, 'd> = BTreeMap::new();
    for doc in scored {
        ranking.entry(doc.category()).or_default().push(doc);
    }
    for docs in ranking.values_mut() {
        // `sort_by` is stable.
        docs.sort_by(|a, b| b.priority.score.total_cmp(&a.priority.score));
        docs.truncate(k);
    }
    ranking.retain(|_, docs| !docs.is_empty());
    ranking
}

/// Number of scored documents per category, before truncation.
pub fn category_counts(scored: &[ScoredDocument<'_>]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for doc in scored {
        *counts.entry(doc.category()).or_insert(0) += 1;
    }
    counts
}

/// Flatten a ranking into persisted rows, rank 1 first.
pub fn to_rank_slots(ranking: &Ranking<'_, '_>, period: ProcessingPeriod) -> Vec<RankSlot> {
    ranking
        .iter()
        .flat_map(|(category, docs)| {
            docs.iter().enumerate().map(move |(i, doc)| RankSlot {
                processing_period: period,
                category: *category,
                rank: i as u32 + 1,
                law_key: doc.document.law_key.clone(),
                priority_score: doc.priority.score,
                score_breakdown: doc.priority.breakdown(),
                category_scores: doc.assignment.scores_json(),
                impact_keywords: doc.impact_keywords.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    fn doc(key: &str, name: &str, reason: &str) -> NormalizedDocument {
        NormalizedDocument::new(key, name, period()).with_reason(reason)
    }

    #[test]
    fn groups_and_orders_by_score() {
        let docs = vec![
            doc("h1", "의료법", "보건 위생"),
            doc("h2", "응급의료법", ""),
            doc("l1", "근로기준법", "최저임금"),
        ];
        let scored = score_all(&docs);
        let ranking = rank_and_select(&scored, DEFAULT_TOP_K);

        let health: Vec<&str> = ranking[&Category::Health]
            .iter()
            .map(|d| d.document.law_key.as_str())
            .collect();
        assert_eq!(health, vec!["h2", "h1"]);
        assert_eq!(ranking[&Category::Labor].len(), 1);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let docs = vec![
            doc("a", "의료법", "응급의료"),
            doc("b", "의료법", "응급의료"),
            doc("c", "의료법", "응급의료"),
        ];
        let scored = score_all(&docs);
        let ranking = rank_and_select(&scored, DEFAULT_TOP_K);
        let keys: Vec<&str> = ranking[&Category::Health]
            .iter()
            .map(|d| d.document.law_key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn truncates_to_k() {
        let docs: Vec<NormalizedDocument> = (0..8)
            .map(|i| doc(&format!("k{i}"), "의료법", "응급의료"))
            .collect();
        let scored = score_all(&docs);
        assert_eq!(rank_and_select(&scored, 5)[&Category::Health].len(), 5);
        assert_eq!(rank_and_select(&scored, 3)[&Category::Health].len(), 3);
        assert_eq!(category_counts(&scored)[&Category::Health], 8);
    }

    #[test]
    fn fewer_than_k_is_not_padded() {
        let docs = vec![doc("a", "의료법", ""), doc("b", "의료법", "")];
        let scored = score_all(&docs);
        assert_eq!(rank_and_select(&scored, 5)[&Category::Health].len(), 2);
    }

    #[test]
    fn empty_category_yields_no_slots() {
        let docs = vec![doc("a", "의료법", "")];
        let scored = score_all(&docs);
        let ranking = rank_and_select(&scored, 5);
        assert!(!ranking.contains_key(&Category::Culture));

        let slots = to_rank_slots(&ranking, period());
        assert!(slots.iter().all(|s| s.category == Category::Health));

        assert!(rank_and_select(&[], 5).is_empty());
    }

    #[test]
    fn zero_k_selects_nothing() {
        let docs = vec![doc("a", "의료법", "")];
        let scored = score_all(&docs);
        assert!(rank_and_select(&scored, 0).is_empty());
    }

    #[test]
    fn rank_slots_carry_breakdown_and_keywords() {
        let docs = vec![
            doc("h1", "의료법", "의료비 지원 확대"),
            doc("h2", "응급의료법", ""),
            doc("e1", "행정규칙", ""),
        ];
        let scored = score_all(&docs);
        let slots = to_rank_slots(&rank_and_select(&scored, 5), period());

        assert_eq!(slots.len(), 3);
        // Category order first, then rank.
        assert_eq!(slots[0].category, Category::Health);
        assert_eq!(slots[0].rank, 1);
        assert_eq!(slots[0].law_key, "h2");
        assert_eq!(slots[1].rank, 2);
        assert_eq!(slots[1].impact_keywords, vec!["확대", "지원"]);
        assert_eq!(slots[1].score_breakdown["primary_keyword"], "의료비");
        assert_eq!(slots[1].category_scores["HEALTH"], 4);
        assert_eq!(slots[2].category, Category::Etc);
        assert_eq!(slots[2].score_breakdown["tier"], "general");
    }
}
