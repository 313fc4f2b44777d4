//! The fixed subject taxonomy every document is assigned into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown category code: {0:?}")]
pub struct UnknownCategory(pub String);

/// Subject category codes.
///
/// Declaration order is the enumeration order: the classifier evaluates
/// categories in this order and resolves score ties in favour of the earlier
/// one. `Etc` is the fallback and is never scored by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Health,
    Welfare,
    Tax,
    Labor,
    Education,
    Family,
    Housing,
    Transport,
    Environment,
    Culture,
    Business,
    Special,
    Etc,
}

impl Category {
    /// Categories the classifier scores, in tie-break order.
    pub const CLASSIFIED: [Category; 12] = [
        Category::Health,
        Category::Welfare,
        Category::Tax,
        Category::Labor,
        Category::Education,
        Category::Family,
        Category::Housing,
        Category::Transport,
        Category::Environment,
        Category::Culture,
        Category::Business,
        Category::Special,
    ];

    /// Every valid code, fallback last.
    pub const ALL: [Category; 13] = [
        Category::Health,
        Category::Welfare,
        Category::Tax,
        Category::Labor,
        Category::Education,
        Category::Family,
        Category::Housing,
        Category::Transport,
        Category::Environment,
        Category::Culture,
        Category::Business,
        Category::Special,
        Category::Etc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Health => "HEALTH",
            Self::Welfare => "WELFARE",
            Self::Tax => "TAX",
            Self::Labor => "LABOR",
            Self::Education => "EDUCATION",
            Self::Family => "FAMILY",
            Self::Housing => "HOUSING",
            Self::Transport => "TRANSPORT",
            Self::Environment => "ENVIRONMENT",
            Self::Culture => "CULTURE",
            Self::Business => "BUSINESS",
            Self::Special => "SPECIAL",
            Self::Etc => "ETC",
        }
    }

    /// Look up a category by its code. Matching is exact.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Korean display name.
    pub fn name_ko(&self) -> &'static str {
        match self {
            Self::Health => "의료/건강",
            Self::Welfare => "복지/사회보장",
            Self::Tax => "경제/세무",
            Self::Labor => "근로/고용",
            Self::Education => "교육/학술",
            Self::Family => "가족/육아",
            Self::Housing => "주택/부동산",
            Self::Transport => "교통/운송",
            Self::Environment => "환경/안전",
            Self::Culture => "문화/여가",
            Self::Business => "사업/창업",
            Self::Special => "전문/특수",
            Self::Etc => "기타",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Health => "의료, 건강, 병원, 약국 관련",
            Self::Welfare => "복지, 연금, 보험, 지원 관련",
            Self::Tax => "세금, 소득, 관세 관련",
            Self::Labor => "근로, 임금, 고용 관련",
            Self::Education => "교육, 학교, 연구 관련",
            Self::Family => "가족, 육아, 출산 관련",
            Self::Housing => "주택, 부동산, 임대 관련",
            Self::Transport => "교통, 운송, 도로 관련",
            Self::Environment => "환경, 안전, 재해 관련",
            Self::Culture => "문화, 관광, 체육 관련",
            Self::Business => "사업, 창업, 소상공인 관련",
            Self::Special => "군사, 외교, 전문기술 관련",
            Self::Etc => "기타 분류되지 않은 법령",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_code(cat.code()), Some(cat));
            assert_eq!(cat.to_string().parse::<Category>(), Ok(cat));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(Category::from_code("health"), None);
        assert_eq!(
            "MILITARY".parse::<Category>(),
            Err(UnknownCategory("MILITARY".into()))
        );
    }

    #[test]
    fn classified_excludes_fallback() {
        assert_eq!(Category::CLASSIFIED.len(), 12);
        assert!(!Category::CLASSIFIED.contains(&Category::Etc));
        assert_eq!(Category::ALL.last(), Some(&Category::Etc));
    }

    #[test]
    fn ordering_follows_enumeration() {
        let mut shuffled = vec![Category::Etc, Category::Tax, Category::Health];
        shuffled.sort();
        assert_eq!(shuffled, vec![Category::Health, Category::Tax, Category::Etc]);
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Category::Environment).unwrap();
        assert_eq!(json, "\"ENVIRONMENT\"");
        let back: Category = serde_json::from_str("\"ETC\"").unwrap();
        assert_eq!(back, Category::Etc);
    }
}
