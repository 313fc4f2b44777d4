//! Terminal rendering for rankings, run reports and stored records.
//!
//! Stored records come back from the store as Arrow batches and are rendered
//! as vertical cards grouped into sections.

use std::collections::BTreeMap;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use lawdigest_core::{Category, ProcessingPeriod};
use lawdigest_pipeline::RunReport;
use lawdigest_rank::{Ranking, ScoredDocument};

const MAX_NAME_CHARS: usize = 40;

// ── Card section groupings ──

const IDENTITY: &[&str] = &[
    "law_key",
    "law_name_korean",
    "law_type",
    "revision_type",
    "department",
];

const DATES: &[&str] = &[
    "processing_month",
    "promulgation_date",
    "enforcement_date",
    "grace_period_days",
];

const RANKING: &[&str] = &[
    "category_code",
    "category_rank",
    "priority_score",
    "primary_keyword",
    "impact_keywords",
];

// ── Public API ──

/// Print one stored document (row 0 of a `law_data` batch) and, when given,
/// its rank slot (row 0 of a `processed_law` batch).
pub fn print_document_card(document: &RecordBatch, slot: Option<&RecordBatch>) {
    let name = cell(document, "law_name_korean", 0).unwrap_or_default();
    let key = cell(document, "law_key", 0).unwrap_or_default();

    println!("=== {name} ===");
    println!("{key}");
    println!();

    print_section(document, "Identity", IDENTITY);
    print_section(document, "Dates", DATES);
    if let Some(slot) = slot {
        print_section(slot, "Ranking", RANKING);
    }
}

/// Print a ranking grouped by category in enumeration order.
pub fn print_ranking(
    period: ProcessingPeriod,
    ranking: &Ranking<'_, '_>,
    counts: &BTreeMap<Category, usize>,
) {
    for line in ranking_lines(period, ranking, counts) {
        println!("{line}");
    }
}

/// Print the summary of a finished run.
pub fn print_report(report: &RunReport) {
    for line in report_lines(report) {
        println!("{line}");
    }
}

// ── Line builders ──

fn section_lines(batch: &RecordBatch, header: &str, cols: &[&str]) -> Vec<String> {
    let rows: Vec<String> = cols
        .iter()
        .filter_map(|&col| cell(batch, col, 0).map(|v| format!("  {col:<26} {v}")))
        .collect();
    if rows.is_empty() {
        return rows;
    }
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header.to_string());
    lines.extend(rows);
    lines.push(String::new());
    lines
}

fn print_section(batch: &RecordBatch, header: &str, cols: &[&str]) {
    for line in section_lines(batch, header, cols) {
        println!("{line}");
    }
}

fn ranking_lines(
    period: ProcessingPeriod,
    ranking: &Ranking<'_, '_>,
    counts: &BTreeMap<Category, usize>,
) -> Vec<String> {
    let mut lines = vec![format!("=== {period} ==="), String::new()];
    if ranking.is_empty() {
        lines.push("  (no documents)".to_string());
        return lines;
    }
    for (category, docs) in ranking {
        let total = counts.get(category).copied().unwrap_or(docs.len());
        lines.push(format!(
            "{} {} ({} of {})",
            category.code(),
            category.name_ko(),
            docs.len(),
            total
        ));
        for (i, doc) in docs.iter().enumerate() {
            lines.push(entry_line(i + 1, doc));
            if !doc.impact_keywords.is_empty() {
                lines.push(format!("       impact: {}", doc.impact_keywords.join(", ")));
            }
        }
        lines.push(String::new());
    }
    lines
}

fn entry_line(rank: usize, doc: &ScoredDocument<'_>) -> String {
    format!(
        "  {rank}. {:>5.1}  {:<width$}  [{} / {}]",
        doc.priority.score,
        truncate(&doc.document.name_korean, MAX_NAME_CHARS),
        doc.priority.primary_keyword,
        doc.priority.tier,
        width = MAX_NAME_CHARS,
    )
}

fn report_lines(report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        format!("=== run {} ===", report.period),
        format!("  {:<26} {}", "listed", report.listed),
        format!(
            "  {:<26} {} ({} errors)",
            "fetched", report.fetched, report.fetch_errors
        ),
        format!(
            "  {:<26} {} ({} failed, {} duplicates)",
            "normalized", report.normalized, report.normalize_failures, report.duplicates
        ),
        format!("  {:<26} {}", "deleted", report.deleted),
        format!("  {:<26} {}", "documents_written", report.documents_written),
        format!("  {:<26} {}", "slots_written", report.slots_written),
        format!(
            "  {:<26} {}",
            "categories_populated", report.categories_populated
        ),
        format!("  {:<26} {} ms", "duration", report.duration_ms),
    ];
    if !report.category_counts.is_empty() {
        lines.push(String::new());
        lines.push("Category counts".to_string());
        for (code, count) in &report.category_counts {
            lines.push(format!("  {code:<26} {count}"));
        }
    }
    lines
}

// ── Helpers ──

/// Formatted value of a named column at `row`, or `None` when absent or null.
fn cell(batch: &RecordBatch, col_name: &str, row: usize) -> Option<String> {
    let idx = batch.schema().index_of(col_name).ok()?;
    let col = batch.column(idx);
    if row >= col.len() || col.is_null(row) {
        return None;
    }
    let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default()).ok()?;
    let value = formatter.value(row).to_string();
    (!value.is_empty()).then_some(value)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawdigest_core::NormalizedDocument;
    use lawdigest_core::schema::documents_batch;
    use lawdigest_rank::{category_counts, rank_and_select, score_all};

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    #[test]
    fn section_skips_null_columns() {
        let doc = NormalizedDocument::new("K1", "의료법", period()).with_department("보건복지부");
        let batch = documents_batch(&[doc]).unwrap();

        let lines = section_lines(&batch, "Identity", IDENTITY);
        assert_eq!(lines[0], "Identity");
        assert!(lines.iter().any(|l| l.contains("law_key") && l.ends_with("K1")));
        assert!(lines.iter().any(|l| l.ends_with("보건복지부")));
        assert!(!lines.iter().any(|l| l.contains("law_type")));
    }

    #[test]
    fn empty_section_prints_nothing() {
        let doc = NormalizedDocument::new("K1", "의료법", period());
        let batch = documents_batch(&[doc]).unwrap();
        let lines = section_lines(&batch, "Missing", &["no_such_column"]);
        assert!(lines.is_empty());
    }

    #[test]
    fn ranking_lists_categories_with_counts() {
        let docs = vec![
            NormalizedDocument::new("h1", "의료법", period()),
            NormalizedDocument::new("h2", "응급의료법", period()),
            NormalizedDocument::new("l1", "근로기준법", period()),
        ];
        let scored = score_all(&docs);
        let ranking = rank_and_select(&scored, 1);
        let lines = ranking_lines(period(), &ranking, &category_counts(&scored));

        assert_eq!(lines[0], "=== 2024-12 ===");
        assert!(lines.iter().any(|l| l.starts_with("HEALTH") && l.ends_with("(1 of 2)")));
        assert!(lines.iter().any(|l| l.starts_with("LABOR") && l.ends_with("(1 of 1)")));
    }

    #[test]
    fn empty_ranking_says_so() {
        let ranking = Ranking::new();
        let lines = ranking_lines(period(), &ranking, &BTreeMap::new());
        assert_eq!(lines.last().map(String::as_str), Some("  (no documents)"));
    }

    #[test]
    fn truncates_long_names_by_chars() {
        let name = "가".repeat(50);
        let short = truncate(&name, 10);
        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("짧은", 10), "짧은");
    }

    #[test]
    fn report_includes_category_counts() {
        let report = RunReport {
            period: period(),
            listed: 3,
            fetched: 3,
            fetch_errors: 0,
            normalized: 3,
            normalize_failures: 0,
            duplicates: 0,
            deleted: 0,
            documents_written: 3,
            slots_written: 3,
            category_counts: BTreeMap::from([("HEALTH".to_string(), 3)]),
            categories_populated: 1,
            duration_ms: 12,
        };
        let lines = report_lines(&report);
        assert_eq!(lines[0], "=== run 2024-12 ===");
        assert!(lines.iter().any(|l| l.contains("HEALTH") && l.ends_with('3')));
    }
}
