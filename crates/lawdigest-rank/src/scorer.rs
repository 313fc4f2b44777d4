//! Category-specific priority scoring.
//!
//! Keyword categories take the single best-matching keyword's points (the
//! maximum, never a sum), scale it by the first matching audience multiplier,
//! and add an optional direction bonus. `Etc` documents are scored from their
//! administering department, law type and amendment type instead.

use lawdigest_core::{Category, NormalizedDocument};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::keywords::{GENERAL, ScoringTable, lookup, scoring_table};

/// Upper bound of every priority score.
pub const MAX_SCORE: f64 = 100.0;

/// Bounded score plus the breakdown explaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    /// Final score in `[0, 100]`.
    pub score: f64,
    /// Keyword that produced the tier points; `"<dept> 소관"` for `Etc`.
    pub primary_keyword: String,
    pub tier: String,
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction_bonus: Option<f64>,
    /// Department base after law/amendment scaling (`Etc` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_bonus: Option<f64>,
}

impl PriorityScore {
    /// Breakdown as a JSON object for the rank slot's `score_breakdown`.
    pub fn breakdown(&self) -> Value {
        let mut map = Map::new();
        map.insert("score".into(), Value::from(self.score));
        map.insert("primary_keyword".into(), Value::from(self.primary_keyword.as_str()));
        map.insert("tier".into(), Value::from(self.tier.as_str()));
        map.insert("multiplier".into(), Value::from(self.multiplier));
        if let Some(bonus) = self.direction_bonus {
            map.insert("direction_bonus".into(), Value::from(bonus));
        }
        if let Some(base) = self.base_score {
            map.insert("base_score".into(), Value::from(base));
        }
        if let Some(bonus) = self.keyword_bonus {
            map.insert("keyword_bonus".into(), Value::from(bonus));
        }
        Value::Object(map)
    }
}

/// Score a document within its assigned category.
pub fn score(doc: &NormalizedDocument, category: Category) -> PriorityScore {
    match category {
        Category::Etc => score_general(doc),
        keyed => match scoring_table(keyed) {
            Some(table) => score_with_table(doc, table),
            None => score_general(doc),
        },
    }
}

/// Score by category code. Unrecognised codes are scored as `Etc`.
pub fn score_code(doc: &NormalizedDocument, code: &str) -> PriorityScore {
    match Category::from_code(code) {
        Some(category) => score(doc, category),
        None => {
            warn!(code, law_key = %doc.law_key, "unknown category, scoring as ETC");
            score_general(doc)
        }
    }
}

fn score_with_table(doc: &NormalizedDocument, table: &ScoringTable) -> PriorityScore {
    let text = doc.search_text();

    let mut max_score = 0u32;
    let mut found_keyword = "";
    for (keyword, points) in table.keyword_universe() {
        if points > max_score && text.contains(keyword) {
            max_score = points;
            found_keyword = keyword;
        }
    }

    let multiplier = table
        .audience
        .iter()
        .find(|rule| rule.phrases.iter().any(|p| text.contains(*p)))
        .map(|rule| rule.multiplier)
        .unwrap_or(1.0);

    let direction_bonus = (!table.direction.is_empty()).then(|| {
        table
            .direction
            .iter()
            .find(|rule| rule.phrases.iter().any(|p| text.contains(*p)))
            .map(|rule| rule.bonus)
            .unwrap_or(0.0)
    });

    let raw = f64::from(max_score) * multiplier + direction_bonus.unwrap_or(0.0);

    PriorityScore {
        score: raw.min(MAX_SCORE),
        primary_keyword: found_keyword.to_string(),
        tier: table.label_for(max_score).to_string(),
        multiplier,
        direction_bonus,
        base_score: None,
        keyword_bonus: None,
    }
}

fn score_general(doc: &NormalizedDocument) -> PriorityScore {
    let text = doc.search_text();
    let department = doc.department();

    let law_factor = doc
        .law_type
        .as_deref()
        .and_then(|t| lookup(GENERAL.law_type_factor, t))
        .unwrap_or(1.0);
    let revision_factor = doc
        .revision_type
        .as_deref()
        .and_then(|t| lookup(GENERAL.revision_type_factor, t))
        .unwrap_or(1.0);

    let base = lookup(GENERAL.department_base, department).unwrap_or(GENERAL.default_base);
    let base_score = base * law_factor * revision_factor;

    let keyword_bonus: f64 = GENERAL
        .keyword_bonus
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, bonus)| bonus)
        .sum();

    PriorityScore {
        score: (base_score + keyword_bonus).min(MAX_SCORE),
        primary_keyword: format!("{department} 소관"),
        tier: GENERAL.label.to_string(),
        multiplier: law_factor * revision_factor,
        direction_bonus: None,
        base_score: Some(base_score),
        keyword_bonus: Some(keyword_bonus),
    }
}
