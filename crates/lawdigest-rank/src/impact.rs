use lawdigest_core::NormalizedDocument;

use crate::keywords::{IMPACT_KEYWORDS, MAX_IMPACT_KEYWORDS};

/// Generic change phrases present in the amendment reason, in list order,
/// at most five.
pub fn extract_impact_keywords(doc: &NormalizedDocument) -> Vec<String> {
    let reason = doc.reason();
    IMPACT_KEYWORDS
        .iter()
        .filter(|k| reason.contains(**k))
        .take(MAX_IMPACT_KEYWORDS)
        .map(|k| k.to_string())
        .collect()
}
