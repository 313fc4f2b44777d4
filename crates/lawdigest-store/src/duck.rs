//! DuckDB gateway for period documents and rank slots.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use duckdb::{Connection, params};
use lawdigest_core::{Category, NormalizedDocument, ProcessingPeriod, RankSlot};
use tracing::info;

use crate::StoreError;
use crate::gateway::{PeriodWrite, PersistenceGateway, WriteOutcome};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS law_category (
    category_code VARCHAR PRIMARY KEY,
    name_ko       VARCHAR NOT NULL,
    description   VARCHAR NOT NULL,
    display_order INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS law_data (
    law_key               VARCHAR NOT NULL,
    processing_month      VARCHAR NOT NULL,
    law_id                VARCHAR,
    law_name_korean       VARCHAR NOT NULL,
    law_name_chinese      VARCHAR,
    law_name_abbreviation VARCHAR,
    promulgation_number   VARCHAR,
    promulgation_date_str VARCHAR,
    promulgation_date     DATE,
    enforcement_date_str  VARCHAR,
    enforcement_date      DATE,
    grace_period_days     BIGINT,
    revision_type         VARCHAR,
    law_type              VARCHAR,
    law_type_code         VARCHAR,
    department            VARCHAR,
    department_code       VARCHAR,
    language              VARCHAR,
    phone_number          VARCHAR,
    chapter_section       VARCHAR,
    is_promulgated_law    VARCHAR,
    revision_content      VARCHAR,
    revision_reason       VARCHAR,
    total_articles        INTEGER,
    total_addenda         INTEGER,
    PRIMARY KEY (law_key, processing_month)
);
CREATE TABLE IF NOT EXISTS processed_law (
    processing_month VARCHAR NOT NULL,
    category_code    VARCHAR NOT NULL,
    category_rank    INTEGER NOT NULL,
    law_key          VARCHAR NOT NULL,
    priority_score   DOUBLE NOT NULL,
    primary_keyword  VARCHAR,
    score_breakdown  VARCHAR NOT NULL,
    category_scores  VARCHAR NOT NULL,
    impact_keywords  VARCHAR NOT NULL,
    PRIMARY KEY (processing_month, category_code, category_rank)
);
";

const DOCUMENT_COLUMNS: &str = "law_key, law_id, law_name_korean, law_name_chinese,
    law_name_abbreviation, promulgation_number, promulgation_date_str,
    CAST(promulgation_date AS VARCHAR), enforcement_date_str,
    CAST(enforcement_date AS VARCHAR), grace_period_days, revision_type, law_type,
    law_type_code, department, department_code, language, phone_number,
    chapter_section, is_promulgated_law, revision_content, revision_reason,
    total_articles, total_addenda";

/// DuckDB store holding `law_data`, `law_category` and `processed_law`.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Tables are created on open and the category table is seeded, so a fresh
/// file is immediately writable.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create missing tables and upsert the category rows.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        let mut stmt = self.conn.prepare(
            "INSERT OR REPLACE INTO law_category (category_code, name_ko, description, display_order)
             VALUES (?, ?, ?, ?)",
        )?;
        for (order, category) in Category::ALL.iter().enumerate() {
            stmt.execute(params![
                category.code(),
                category.name_ko(),
                category.description(),
                order as i32 + 1
            ])?;
        }
        Ok(())
    }

    // ── Counts ──

    pub fn category_count(&self) -> Result<usize, StoreError> {
        self.count_where("law_category", "TRUE", None)
    }

    fn count_where(
        &self,
        table: &str,
        predicate: &str,
        period: Option<ProcessingPeriod>,
    ) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {table} WHERE {predicate}");
        let mut stmt = self.conn.prepare(&sql)?;
        let batches: Vec<RecordBatch> = match period {
            Some(p) => stmt.query_arrow([p.to_string()])?.collect(),
            None => stmt.query_arrow([])?.collect(),
        };
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Period views ──

    /// Rank slots of a period joined with document name and category label,
    /// as Arrow batches for display.
    pub fn period_ranking(&self, period: ProcessingPeriod) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.category_code, c.name_ko AS category, p.category_rank AS rank,
                    p.law_key, d.law_name_korean, d.department,
                    round(p.priority_score, 1) AS score, p.primary_keyword
             FROM processed_law p
             JOIN law_category c ON c.category_code = p.category_code
             LEFT JOIN law_data d
               ON d.law_key = p.law_key AND d.processing_month = p.processing_month
             WHERE p.processing_month = ?
             ORDER BY c.display_order, p.category_rank",
        )?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([period.to_string()])?.collect();
        Ok(batches)
    }

    // ── Escape hatch ──

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }
}

impl PersistenceGateway for DuckStore {
    fn write_period(&mut self, write: &PeriodWrite<'_>) -> Result<WriteOutcome, StoreError> {
        write.validate()?;
        let month = write.period.to_string();
        let mut outcome = WriteOutcome::default();

        // Dropping the transaction without commit rolls back.
        let tx = self.conn.transaction()?;

        if write.replace_existing {
            outcome.deleted_slots = tx.execute(
                "DELETE FROM processed_law WHERE processing_month = ?",
                params![month],
            )?;
            outcome.deleted_documents = tx.execute(
                "DELETE FROM law_data WHERE processing_month = ?",
                params![month],
            )?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO law_data (
                    law_key, processing_month, law_id, law_name_korean, law_name_chinese,
                    law_name_abbreviation, promulgation_number, promulgation_date_str,
                    promulgation_date, enforcement_date_str, enforcement_date,
                    grace_period_days, revision_type, law_type, law_type_code, department,
                    department_code, language, phone_number, chapter_section,
                    is_promulgated_law, revision_content, revision_reason,
                    total_articles, total_addenda
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, CAST(? AS DATE), ?, CAST(? AS DATE),
                           ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for doc in write.documents {
                stmt.execute(params![
                    doc.law_key,
                    month,
                    doc.law_id,
                    doc.name_korean,
                    doc.name_chinese,
                    doc.name_abbreviation,
                    doc.promulgation_number,
                    doc.promulgation_date_str,
                    doc.promulgation_date,
                    doc.enforcement_date_str,
                    doc.enforcement_date,
                    doc.grace_period_days,
                    doc.revision_type,
                    doc.law_type,
                    doc.law_type_code,
                    doc.department,
                    doc.department_code,
                    doc.language,
                    doc.phone_number,
                    doc.chapter_section,
                    doc.is_promulgated_law,
                    doc.revision_content,
                    doc.revision_reason,
                    doc.total_articles,
                    doc.total_addenda,
                ])?;
                outcome.documents_written += 1;
            }
        }

        for category in write.categories() {
            outcome.deleted_slots += tx.execute(
                "DELETE FROM processed_law WHERE processing_month = ? AND category_code = ?",
                params![month, category.code()],
            )?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO processed_law (
                    processing_month, category_code, category_rank, law_key, priority_score,
                    primary_keyword, score_breakdown, category_scores, impact_keywords
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for slot in write.slots {
                let primary_keyword = slot
                    .score_breakdown
                    .get("primary_keyword")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                stmt.execute(params![
                    month,
                    slot.category.code(),
                    slot.rank,
                    slot.law_key,
                    slot.priority_score,
                    primary_keyword,
                    serde_json::to_string(&slot.score_breakdown)?,
                    serde_json::to_string(&slot.category_scores)?,
                    serde_json::to_string(&slot.impact_keywords)?,
                ])?;
                outcome.slots_written += 1;
            }
        }

        tx.commit()?;
        info!(
            period = %write.period,
            deleted = outcome.deleted_documents,
            documents = outcome.documents_written,
            slots = outcome.slots_written,
            "wrote period to duckdb"
        );
        Ok(outcome)
    }

    fn document_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError> {
        self.count_where("law_data", "processing_month = ?", Some(period))
    }

    fn rank_slot_count(&self, period: ProcessingPeriod) -> Result<usize, StoreError> {
        self.count_where("processed_law", "processing_month = ?", Some(period))
    }

    fn documents(&self, period: ProcessingPeriod) -> Result<Vec<NormalizedDocument>, StoreError> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM law_data WHERE processing_month = ? ORDER BY law_key"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([period.to_string()], |row| {
            Ok(NormalizedDocument {
                law_key: row.get(0)?,
                law_id: row.get(1)?,
                name_korean: row.get(2)?,
                name_chinese: row.get(3)?,
                name_abbreviation: row.get(4)?,
                promulgation_number: row.get(5)?,
                promulgation_date_str: row.get(6)?,
                promulgation_date: row.get(7)?,
                enforcement_date_str: row.get(8)?,
                enforcement_date: row.get(9)?,
                grace_period_days: row.get(10)?,
                revision_type: row.get(11)?,
                law_type: row.get(12)?,
                law_type_code: row.get(13)?,
                department: row.get(14)?,
                department_code: row.get(15)?,
                language: row.get(16)?,
                phone_number: row.get(17)?,
                chapter_section: row.get(18)?,
                is_promulgated_law: row.get(19)?,
                revision_content: row.get(20)?,
                revision_reason: row.get(21)?,
                total_articles: row.get(22)?,
                total_addenda: row.get(23)?,
                processing_period: period,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn rank_slots(&self, period: ProcessingPeriod) -> Result<Vec<RankSlot>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.category_code, p.category_rank, p.law_key, p.priority_score,
                    p.score_breakdown, p.category_scores, p.impact_keywords
             FROM processed_law p
             JOIN law_category c ON c.category_code = p.category_code
             WHERE p.processing_month = ?
             ORDER BY c.display_order, p.category_rank",
        )?;
        let rows = stmt.query_map([period.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut slots = Vec::new();
        for row in rows {
            let (code, rank, law_key, priority_score, breakdown, scores, keywords) = row?;
            let category = Category::from_code(&code)
                .ok_or_else(|| StoreError::Other(format!("unknown category code {code}")))?;
            slots.push(RankSlot {
                processing_period: period,
                category,
                rank: u32::try_from(rank)
                    .map_err(|_| StoreError::Other(format!("rank out of range: {rank}")))?,
                law_key,
                priority_score,
                score_breakdown: serde_json::from_str(&breakdown)?,
                category_scores: serde_json::from_str(&scores)?,
                impact_keywords: serde_json::from_str(&keywords)?,
            });
        }
        Ok(slots)
    }
}
