//! Normalize stage: law.go.kr content JSON into [`NormalizedDocument`]s.
//!
//! Source documents arrive as the raw `법령` object returned by the DRF
//! content endpoint, optionally wrapped in a `{metadata, raw_data}` envelope.
//! Text fields are de-HTML'd and stripped of layout glyphs; dates are parsed
//! leniently and the grace period derived from them.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::{NormalizedDocument, ProcessingPeriod};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("content document has no 법령 root object")]
    MissingRoot,

    #[error("content document has no law key (법령키)")]
    MissingLawKey,
}

/// Date layouts seen in source documents, tried in order.
const DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parse a source date string. Returns `None` for empty or unrecognised input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Days between promulgation and enforcement, when both dates are known.
pub fn grace_period_days(
    promulgation: Option<NaiveDate>,
    enforcement: Option<NaiveDate>,
) -> Option<i64> {
    Some((enforcement? - promulgation?).num_days())
}

/// Strip markup and stray symbols from a source text field.
///
/// Removes HTML tags, seal marks (`(인)`, `(印)`) and `⊙`, drops every
/// character that is not a word character, whitespace, or common legal
/// punctuation, and collapses whitespace runs to a single space.
pub fn clean_text(text: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
    static SEAL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\([인印]\)|⊙").expect("valid regex"));
    static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"[^\w\s.,;:!?()\[\]{}"'「」『』【】〈〉《》\-·ㆍ/]"#).expect("valid regex")
    });
    static SPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let text = TAG_RE.replace_all(text, "");
    let text = SEAL_RE.replace_all(&text, "");
    let text = DISALLOWED_RE.replace_all(&text, "");
    let text = SPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// [`clean_text`] for amendment reasons, which additionally carry a
/// `<법제처 제공>` attribution and bullet glyphs that become `-`.
pub fn clean_revision_reason(text: &str) -> String {
    static BULLET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[◇○◆●]").expect("valid regex"));

    let text = text.replace("<법제처 제공>", "");
    let text = BULLET_RE.replace_all(&text, "-");
    clean_text(&text)
}

/// Convert one raw content document into a period-tagged record.
///
/// Missing optional fields become `None`; only a missing `법령` root or law
/// key rejects the document.
pub fn normalize_document(
    raw: &Value,
    period: ProcessingPeriod,
) -> Result<NormalizedDocument, NormalizeError> {
    let raw = raw.get("raw_data").unwrap_or(raw);
    let root = raw
        .get("법령")
        .filter(|v| v.is_object())
        .ok_or(NormalizeError::MissingRoot)?;
    let law_key = root
        .get("법령키")
        .and_then(text_of)
        .ok_or(NormalizeError::MissingLawKey)?;

    let basic = root.get("기본정보");
    let basic_text = |key: &str| basic.and_then(|b| b.get(key)).and_then(text_of);
    let coded = |key: &str, code_key: &str| {
        let obj = basic.and_then(|b| b.get(key));
        (
            obj.and_then(|o| o.get("content")).and_then(text_of),
            obj.and_then(|o| o.get(code_key)).and_then(text_of),
        )
    };

    let promulgation_date_str = basic_text("공포일자");
    let enforcement_date_str = basic_text("시행일자");
    let promulgation = promulgation_date_str.as_deref().and_then(parse_date);
    let enforcement = enforcement_date_str.as_deref().and_then(parse_date);

    let (department, department_code) = coded("소관부처", "소관부처코드");
    let (law_type, law_type_code) = coded("법종구분", "법종구분코드");

    let revision_content = root
        .get("개정문")
        .and_then(|r| r.get("개정문내용"))
        .and_then(|v| joined_text(v, clean_text));
    let revision_reason = root
        .get("제개정이유")
        .and_then(|r| r.get("제개정이유내용"))
        .and_then(|v| joined_text(v, clean_revision_reason));

    let mut doc = NormalizedDocument::new(
        law_key,
        basic_text("법령명_한글").unwrap_or_default(),
        period,
    );
    doc.law_id = basic_text("법령ID");
    doc.name_chinese = basic_text("법령명_한자");
    doc.name_abbreviation = basic_text("법령명약칭");
    doc.promulgation_number = basic_text("공포번호");
    doc.promulgation_date = promulgation.map(iso_date);
    doc.promulgation_date_str = promulgation_date_str;
    doc.enforcement_date = enforcement.map(iso_date);
    doc.enforcement_date_str = enforcement_date_str;
    doc.grace_period_days = grace_period_days(promulgation, enforcement);
    doc.revision_type = basic_text("제개정구분");
    doc.law_type = law_type;
    doc.law_type_code = law_type_code;
    doc.department = department;
    doc.department_code = department_code;
    doc.language = basic_text("언어");
    doc.phone_number = basic_text("전화번호");
    doc.chapter_section = basic_text("편장절관");
    doc.is_promulgated_law = basic_text("공포법령여부");
    doc.revision_content = revision_content;
    doc.revision_reason = revision_reason;
    doc.total_articles = root
        .get("조문")
        .and_then(|v| v.get("조문단위"))
        .and_then(unit_count);
    doc.total_addenda = root
        .get("부칙")
        .and_then(|v| v.get("부칙단위"))
        .and_then(unit_count);

    Ok(doc)
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Scalar JSON value as trimmed text; empty strings and containers are `None`.
fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Flatten a string, a list of strings, or a list of lists of strings into
/// lines, join them with newlines, and clean the result.
fn joined_text(v: &Value, clean: fn(&str) -> String) -> Option<String> {
    let mut lines = Vec::new();
    match v {
        Value::Array(groups) => {
            for group in groups {
                match group {
                    Value::Array(items) => lines.extend(items.iter().filter_map(text_of)),
                    other => lines.extend(text_of(other)),
                }
            }
        }
        other => lines.extend(text_of(other)),
    }
    if lines.is_empty() {
        return None;
    }
    let cleaned = clean(&lines.join("\n"));
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Number of article/addendum units. A lone object is a single unit.
fn unit_count(v: &Value) -> Option<u32> {
    match v {
        Value::Array(items) if !items.is_empty() => u32::try_from(items.len()).ok(),
        Value::Object(_) => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period() -> ProcessingPeriod {
        ProcessingPeriod::new(2024, 12).unwrap()
    }

    fn sample_content() -> Value {
        json!({
            "법령": {
                "법령키": "0012345202412010001",
                "기본정보": {
                    "법령ID": "001234",
                    "법령명_한글": "근로기준법",
                    "법령명_한자": "勤勞基準法",
                    "공포번호": 20520,
                    "공포일자": "20240910",
                    "시행일자": "20241210",
                    "제개정구분": "일부개정",
                    "언어": "한글",
                    "소관부처": {"content": "고용노동부", "소관부처코드": "1492000"},
                    "법종구분": {"content": "법률", "법종구분코드": "A0002"}
                },
                "조문": {"조문단위": [{}, {}, {}]},
                "부칙": {"부칙단위": {"부칙내용": "이 법은 공포 후 3개월이 경과한 날부터 시행한다."}},
                "개정문": {"개정문내용": [["근로기준법 일부를 다음과 같이 개정한다."], ["<p>제50조 ...</p>"]]},
                "제개정이유": {"제개정이유내용": [["◇ 개정이유", "최저임금 적용 대상을 확대함."], "<법제처 제공>"]}
            }
        })
    }

    #[test]
    fn parse_date_accepts_known_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for s in ["20240301", "2024-03-01", "2024.03.01", "2024/03/01", " 20240301 "] {
            assert_eq!(parse_date(s), Some(expected), "{s:?}");
        }
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024년 3월"), None);
        assert_eq!(parse_date("20241301"), None);
    }

    #[test]
    fn grace_period_needs_both_dates() {
        let p = parse_date("20240910");
        let e = parse_date("20241210");
        assert_eq!(grace_period_days(p, e), Some(91));
        assert_eq!(grace_period_days(p, None), None);
        assert_eq!(grace_period_days(None, e), None);
        assert_eq!(grace_period_days(e, p), Some(-91));
    }

    #[test]
    fn clean_text_strips_markup_and_symbols() {
        assert_eq!(clean_text("<b>제1조</b>  (목적)\n\n이 법은"), "제1조 (목적) 이 법은");
        assert_eq!(clean_text("대통령 (인) 서명 ⊙"), "대통령 서명");
        assert_eq!(clean_text("★특별★ 조치법 「시행령」"), "특별 조치법 「시행령」");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn clean_revision_reason_turns_bullets_into_dashes() {
        let cleaned = clean_revision_reason("◇ 개정이유\n○ 지원 확대 <법제처 제공>");
        assert_eq!(cleaned, "- 개정이유 - 지원 확대");
    }

    #[test]
    fn normalize_full_document() {
        let doc = normalize_document(&sample_content(), period()).unwrap();
        assert_eq!(doc.law_key, "0012345202412010001");
        assert_eq!(doc.law_id.as_deref(), Some("001234"));
        assert_eq!(doc.name_korean, "근로기준법");
        assert_eq!(doc.promulgation_number.as_deref(), Some("20520"));
        assert_eq!(doc.promulgation_date.as_deref(), Some("2024-09-10"));
        assert_eq!(doc.enforcement_date.as_deref(), Some("2024-12-10"));
        assert_eq!(doc.grace_period_days, Some(91));
        assert_eq!(doc.department.as_deref(), Some("고용노동부"));
        assert_eq!(doc.department_code.as_deref(), Some("1492000"));
        assert_eq!(doc.law_type.as_deref(), Some("법률"));
        assert_eq!(doc.law_type_code.as_deref(), Some("A0002"));
        assert_eq!(doc.total_articles, Some(3));
        assert_eq!(doc.total_addenda, Some(1));
        assert_eq!(
            doc.revision_reason.as_deref(),
            Some("- 개정이유 최저임금 적용 대상을 확대함.")
        );
        assert_eq!(
            doc.revision_content.as_deref(),
            Some("근로기준법 일부를 다음과 같이 개정한다. 제50조 ...")
        );
        assert_eq!(doc.processing_period, period());
    }

    #[test]
    fn normalize_unwraps_envelope() {
        let wrapped = json!({
            "metadata": {"law_id": "001234", "month": "2024-12"},
            "raw_data": sample_content()
        });
        let doc = normalize_document(&wrapped, period()).unwrap();
        assert_eq!(doc.name_korean, "근로기준법");
    }

    #[test]
    fn normalize_tolerates_sparse_document() {
        let raw = json!({"법령": {"법령키": "42"}});
        let doc = normalize_document(&raw, period()).unwrap();
        assert_eq!(doc.law_key, "42");
        assert_eq!(doc.name_korean, "");
        assert_eq!(doc.department, None);
        assert_eq!(doc.grace_period_days, None);
        assert_eq!(doc.total_articles, None);
        assert_eq!(doc.revision_reason, None);
    }

    #[test]
    fn normalize_rejects_missing_root_or_key() {
        assert_eq!(
            normalize_document(&json!({"Law": {}}), period()),
            Err(NormalizeError::MissingRoot)
        );
        assert_eq!(
            normalize_document(&json!({"법령": "text"}), period()),
            Err(NormalizeError::MissingRoot)
        );
        assert_eq!(
            normalize_document(&json!({"법령": {"법령키": "  "}}), period()),
            Err(NormalizeError::MissingLawKey)
        );
    }

    #[test]
    fn unparseable_dates_leave_raw_string() {
        let raw = json!({"법령": {"법령키": "1", "기본정보": {"공포일자": "미정", "시행일자": "20240101"}}});
        let doc = normalize_document(&raw, period()).unwrap();
        assert_eq!(doc.promulgation_date_str.as_deref(), Some("미정"));
        assert_eq!(doc.promulgation_date, None);
        assert_eq!(doc.enforcement_date.as_deref(), Some("2024-01-01"));
        assert_eq!(doc.grace_period_days, None);
    }
}
