//! Keyword/department classification into one category per document.
//!
//! Every classifiable category is scored independently; the highest score
//! wins, ties go to the earlier category in [`Category::CLASSIFIED`] order,
//! and an all-zero document falls back to [`Category::Etc`].

use lawdigest_core::{Category, NormalizedDocument};
use serde_json::{Map, Value};

use crate::keywords::{CLASSIFIER_RULES, CONTENT_HIT_POINTS, NAME_HIT_POINTS};

/// Classification result for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub category: Category,
    /// Score per classifiable category, in enumeration order.
    pub scores: Vec<(Category, u32)>,
}

impl CategoryAssignment {
    /// Score the winning category received (0 for the `Etc` fallback).
    pub fn winning_score(&self) -> u32 {
        self.scores
            .iter()
            .find(|(c, _)| *c == self.category)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    /// Scores as a `{code: score}` JSON object, for persistence.
    pub fn scores_json(&self) -> Value {
        let map: Map<String, Value> = self
            .scores
            .iter()
            .map(|(c, s)| (c.code().to_string(), Value::from(*s)))
            .collect();
        Value::Object(map)
    }
}

/// Assign exactly one category to a document. Never fails: absent
/// department or reason text reads as empty.
pub fn classify(doc: &NormalizedDocument) -> CategoryAssignment {
    let name = doc.name_korean.to_lowercase();
    let content = doc.reason().to_lowercase();
    let department = doc.department();

    let scores: Vec<(Category, u32)> = CLASSIFIER_RULES
        .iter()
        .map(|rule| {
            let name_hits = rule.keywords.iter().filter(|k| name.contains(**k)).count() as u32;
            let content_hits = rule.keywords.iter().filter(|k| content.contains(**k)).count() as u32;
            let bonus = if rule.departments.contains(&department) {
                rule.department_bonus
            } else {
                0
            };
            (
                rule.category,
                NAME_HIT_POINTS * name_hits + CONTENT_HIT_POINTS * content_hits + bonus,
            )
        })
        .collect();

    // Strict comparison keeps the first category among equal maxima.
    let mut best: Option<(Category, u32)> = None;
    for &(category, score) in &scores {
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((category, score));
        }
    }

    CategoryAssignment {
        category: best.map(|(c, _)| c).unwrap_or(Category::Etc),
        scores,
    }
}
