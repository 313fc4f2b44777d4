//! Static keyword tables driving classification and priority scoring.
//!
//! Tables are plain data: the classifier and scorers read them but hold no
//! rules of their own, so every weight here can be audited (see
//! [`snapshot`]) and tested independently of the scoring code.
//!
//! Tiers within a category are listed by decreasing typical importance.
//! A keyword may appear in more than one tier; see
//! [`ScoringTable::keyword_universe`] for how duplicates resolve.

use lawdigest_core::Category;
use serde::Serialize;

/// Bumped whenever any weight, phrase, or threshold below changes.
pub const TABLES_VERSION: &str = "2024.12.1";

// ── Classifier ──

/// Per-category keyword list and department bonus used by the classifier.
#[derive(Debug, Serialize)]
pub struct ClassifierRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub departments: &'static [&'static str],
    pub department_bonus: u32,
}

/// Points per keyword found in the document name.
pub const NAME_HIT_POINTS: u32 = 3;
/// Points per keyword found in the amendment reason.
pub const CONTENT_HIT_POINTS: u32 = 1;

/// Classifier rules, one per classifiable category, in enumeration order.
pub static CLASSIFIER_RULES: [ClassifierRule; 12] = [
    ClassifierRule {
        category: Category::Health,
        keywords: &["의료", "건강", "병원", "약", "치료", "진료", "환자", "질병", "수술", "응급"],
        departments: &["보건복지부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Welfare,
        keywords: &[
            "복지", "지원", "급여", "연금", "보험", "생계", "주거급여", "의료급여", "교육급여",
            "장애", "노인",
        ],
        departments: &["보건복지부", "국가보훈부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Tax,
        keywords: &["세금", "소득", "부가가치", "관세", "과세", "세무", "신고", "공제", "감면"],
        departments: &["기획재정부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Labor,
        keywords: &["근로", "임금", "고용", "노동", "최저임금", "근로시간", "휴가", "해고", "산재"],
        departments: &["고용노동부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Education,
        keywords: &["교육", "학교", "학생", "대학", "연구", "학습", "교사", "수업"],
        departments: &["교육부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Family,
        keywords: &["가족", "육아", "출산", "아동", "청소년", "보육", "임신", "교육급여", "가구원"],
        departments: &["여성가족부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Housing,
        keywords: &["주택", "부동산", "임대", "전세", "매매", "분양", "건설"],
        departments: &["국토교통부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Transport,
        keywords: &["교통", "운송", "도로", "자동차", "운전", "대중교통", "지하철", "버스"],
        // Shares a department with HOUSING, so the bonus is smaller.
        departments: &["국토교통부"],
        department_bonus: 3,
    },
    ClassifierRule {
        category: Category::Environment,
        keywords: &["환경", "안전", "재해", "오염", "화학", "폐기물", "기후"],
        departments: &["환경부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Culture,
        keywords: &["문화", "관광", "체육", "예술", "스포츠", "문화재", "박물관"],
        departments: &["문화체육관광부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Business,
        keywords: &["사업", "창업", "소상공인", "중소기업", "기업", "상업", "영업"],
        departments: &["중소벤처기업부"],
        department_bonus: 5,
    },
    ClassifierRule {
        category: Category::Special,
        keywords: &["고엽제", "보훈", "군사", "국방", "외교", "통계", "측량", "특허"],
        departments: &["국가보훈부", "국방부", "외교부"],
        department_bonus: 5,
    },
];

// ── Category scorers ──

/// A named bucket of keyword → points entries.
#[derive(Debug, Serialize)]
pub struct KeywordTier {
    pub name: &'static str,
    pub keywords: &'static [(&'static str, u32)],
}

/// Audience phrase set and the multiplier it triggers.
#[derive(Debug, Serialize)]
pub struct AudienceRule {
    pub phrases: &'static [&'static str],
    pub multiplier: f64,
}

/// Phrase set adding a fixed bonus on top of the multiplied score.
#[derive(Debug, Serialize)]
pub struct DirectionRule {
    pub phrases: &'static [&'static str],
    pub bonus: f64,
}

/// Coarse tier label assigned when `max_score >= min_score`.
#[derive(Debug, Serialize)]
pub struct TierLabel {
    pub min_score: u32,
    pub label: &'static str,
}

/// Everything one category scorer needs.
#[derive(Debug, Serialize)]
pub struct ScoringTable {
    pub category: Category,
    pub tiers: &'static [KeywordTier],
    /// Tested in order; the first rule with any phrase present wins.
    pub audience: &'static [AudienceRule],
    /// Tested in order; the first rule with any phrase present wins.
    pub direction: &'static [DirectionRule],
    /// Tested in order; `fallback_label` when none applies.
    pub labels: &'static [TierLabel],
    pub fallback_label: &'static str,
}

impl ScoringTable {
    /// All keywords across tiers as one ordered universe.
    ///
    /// A keyword keeps the position of its first appearance and takes the
    /// points of its last appearance.
    pub fn keyword_universe(&self) -> Vec<(&'static str, u32)> {
        let mut universe: Vec<(&'static str, u32)> = Vec::new();
        for tier in self.tiers {
            for &(keyword, points) in tier.keywords {
                match universe.iter_mut().find(|(k, _)| *k == keyword) {
                    Some(entry) => entry.1 = points,
                    None => universe.push((keyword, points)),
                }
            }
        }
        universe
    }

    /// Label for a raw (pre-multiplier) tier score.
    pub fn label_for(&self, max_score: u32) -> &'static str {
        self.labels
            .iter()
            .find(|l| max_score >= l.min_score)
            .map(|l| l.label)
            .unwrap_or(self.fallback_label)
    }
}

/// Look up the keyword scorer for a category. `Etc` has none; it is scored
/// from [`GENERAL`].
pub fn scoring_table(category: Category) -> Option<&'static ScoringTable> {
    SCORING_TABLES.iter().find(|t| t.category == category)
}

pub static SCORING_TABLES: [ScoringTable; 12] = [
    ScoringTable {
        category: Category::Health,
        tiers: &[
            KeywordTier {
                name: "life_critical",
                keywords: &[
                    ("응급의료", 60), ("생명위험", 60), ("중환자", 55), ("암", 55), ("심장", 55),
                    ("뇌", 55), ("수술", 50), ("중독", 50), ("감염병", 55), ("전염병", 55),
                    ("의료사고", 50), ("환자안전", 50),
                ],
            },
            KeywordTier {
                name: "access",
                keywords: &[
                    ("의료비", 40), ("진료비", 40), ("수술비", 40), ("건강보험", 38),
                    ("의료급여", 38), ("본인부담", 35), ("의료서비스", 35), ("진료", 35),
                    ("치료", 35), ("병원", 30), ("의원", 30), ("약국", 30),
                ],
            },
            KeywordTier {
                name: "prevention",
                keywords: &[
                    ("예방접종", 25), ("건강검진", 25), ("예방", 20), ("건강관리", 20),
                    ("보건", 18), ("위생", 18), ("건강증진", 15), ("상담", 15),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국민", "모든환자", "전체"], multiplier: 1.5 },
            AudienceRule { phrases: &["아동", "노인", "임산부", "장애인"], multiplier: 1.3 },
            AudienceRule { phrases: &["환자", "의료진"], multiplier: 1.2 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 50, label: "life_critical" },
            TierLabel { min_score: 30, label: "access" },
        ],
        fallback_label: "prevention",
    },
    ScoringTable {
        category: Category::Welfare,
        tiers: &[
            KeywordTier {
                name: "survival",
                keywords: &[
                    ("기초생활수급", 85), ("생계급여", 85), ("의료급여", 80), ("주거급여", 80),
                    ("교육급여", 75), ("긴급지원", 80), ("기초연금", 75), ("국민연금", 75),
                    ("장애연금", 75), ("아동수당", 70), ("양육수당", 70), ("보육료", 70),
                ],
            },
            KeywordTier {
                name: "basic_living",
                keywords: &[
                    ("돌봄서비스", 60), ("재가서비스", 60), ("방문서비스", 55),
                    ("장애인활동지원", 60), ("노인장기요양", 60), ("치매", 55), ("보건소", 50),
                    ("복지관", 50), ("상담", 45), ("사회복지시설", 50), ("복지서비스", 50),
                ],
            },
            KeywordTier {
                name: "participation",
                keywords: &[
                    ("자립지원", 40), ("취업지원", 40), ("직업재활", 40), ("사회복귀", 35),
                    ("재활", 35), ("자활", 40), ("사회통합", 35), ("문화활동", 30), ("여가", 25),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["기초생활수급자", "차상위", "저소득"], multiplier: 1.5 },
            AudienceRule { phrases: &["장애인", "노인", "아동", "한부모"], multiplier: 1.3 },
            AudienceRule { phrases: &["임산부", "영유아", "청소년"], multiplier: 1.2 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "survival" },
            TierLabel { min_score: 45, label: "basic_living" },
        ],
        fallback_label: "participation",
    },
    ScoringTable {
        category: Category::Tax,
        tiers: &[
            KeywordTier {
                name: "income_impact",
                keywords: &[
                    ("소득세", 70), ("종합소득세", 70), ("근로소득세", 70), ("부가가치세", 65),
                    ("법인세", 60), ("종합부동산세", 60), ("세율", 65), ("공제", 60),
                    ("감면", 60), ("면제", 55), ("최저임금", 70), ("연금", 65), ("보험료", 60),
                ],
            },
            KeywordTier {
                name: "convenience",
                keywords: &[
                    ("세무신고", 45), ("신고절차", 45), ("전자신고", 40), ("간소화", 40),
                    ("원스톱", 40), ("디지털", 35), ("신고기한", 35), ("납부방법", 30),
                    ("서류", 30),
                ],
            },
            KeywordTier {
                name: "fairness",
                keywords: &[
                    ("세제개편", 30), ("공정과세", 30), ("형평성", 25), ("조세회피", 25),
                    ("탈세", 25), ("투명성", 20), ("과세형평", 20),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전체납세자", "모든국민", "전국민"], multiplier: 1.4 },
            AudienceRule { phrases: &["근로자", "사업자", "개인사업자"], multiplier: 1.3 },
            AudienceRule { phrases: &["중소기업", "소상공인"], multiplier: 1.2 },
            AudienceRule { phrases: &["대기업", "고소득자"], multiplier: 1.1 },
        ],
        direction: &[
            // Lower burden on taxpayers.
            DirectionRule { phrases: &["인하", "감면", "지원", "혜택"], bonus: 5.0 },
            // Higher burden still matters, slightly less.
            DirectionRule { phrases: &["인상", "신설"], bonus: 3.0 },
        ],
        labels: &[
            TierLabel { min_score: 55, label: "income_impact" },
            TierLabel { min_score: 35, label: "convenience" },
        ],
        fallback_label: "fairness",
    },
    ScoringTable {
        category: Category::Labor,
        tiers: &[
            KeywordTier {
                name: "basic_rights",
                keywords: &[
                    ("최저임금", 80), ("부당해고", 80), ("노동권", 75), ("단결권", 75),
                    ("단체교섭", 75), ("단체행동", 75), ("임금", 70), ("급여", 70),
                    ("수당", 65), ("근로시간", 70), ("휴게시간", 65), ("연장근로", 65),
                ],
            },
            KeywordTier {
                name: "conditions",
                keywords: &[
                    ("휴가", 55), ("연차", 55), ("병가", 55), ("출산휴가", 55),
                    ("육아휴직", 55), ("근로환경", 50), ("안전", 50), ("산업재해", 55),
                    ("산재", 55), ("직업병", 50), ("복리후생", 45), ("퇴직금", 50), ("퇴직", 45),
                ],
            },
            KeywordTier {
                name: "stability",
                keywords: &[
                    ("고용", 40), ("채용", 40), ("취업", 40), ("고용보험", 45),
                    ("실업급여", 45), ("재취업", 40), ("직업훈련", 35), ("취업지원", 35),
                    ("일자리", 40),
                ],
            },
            KeywordTier {
                name: "special_protection",
                keywords: &[
                    ("비정규직", 50), ("파견근로", 50), ("특수고용", 50), ("플랫폼노동", 50),
                    ("프리랜서", 45), ("일용직", 45), ("외국인근로자", 45), ("장애인고용", 50),
                    ("여성근로", 45),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전체근로자", "모든직장인", "전국"], multiplier: 1.4 },
            AudienceRule { phrases: &["정규직", "상용직"], multiplier: 1.3 },
            AudienceRule { phrases: &["비정규직", "임시직", "일용직"], multiplier: 1.2 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 65, label: "basic_rights" },
            TierLabel { min_score: 45, label: "conditions" },
        ],
        fallback_label: "stability",
    },
    ScoringTable {
        category: Category::Education,
        tiers: &[
            KeywordTier {
                name: "opportunity",
                keywords: &[
                    ("의무교육", 80), ("무상교육", 80), ("교육기회", 75), ("입학", 70),
                    ("진학", 70), ("교육접근", 75), ("특수교육", 75), ("다문화교육", 70),
                    ("평생교육", 65), ("교육격차", 75), ("교육불평등", 75),
                ],
            },
            KeywordTier {
                name: "cost",
                keywords: &[
                    ("등록금", 65), ("수업료", 65), ("교육비", 60), ("장학금", 60),
                    ("학자금", 60), ("교육지원", 55), ("급식", 55), ("교재", 50), ("교복", 45),
                ],
            },
            KeywordTier {
                name: "quality",
                keywords: &[
                    ("교육과정", 50), ("교육내용", 50), ("교육방법", 45), ("교사", 50),
                    ("교원", 50), ("교육시설", 45), ("교육환경", 45), ("학급규모", 45),
                    ("교육자료", 40),
                ],
            },
            KeywordTier {
                name: "academic",
                keywords: &[
                    ("연구", 40), ("학술", 40), ("논문", 35), ("학회", 35), ("연구비", 40),
                    ("학술지", 30), ("연구윤리", 35), ("학문의자유", 45),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["모든학생", "전체학생", "전국"], multiplier: 1.4 },
            AudienceRule { phrases: &["초등학생", "중학생", "고등학생"], multiplier: 1.3 },
            AudienceRule { phrases: &["대학생", "대학원생"], multiplier: 1.2 },
            AudienceRule { phrases: &["유아", "아동"], multiplier: 1.2 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "opportunity" },
            TierLabel { min_score: 55, label: "cost" },
            TierLabel { min_score: 45, label: "quality" },
        ],
        fallback_label: "academic",
    },
    ScoringTable {
        category: Category::Family,
        tiers: &[
            KeywordTier {
                name: "childcare",
                keywords: &[
                    ("보육료", 85), ("어린이집", 80), ("유치원", 80), ("육아휴직", 80),
                    ("출산휴가", 80), ("출산", 75), ("임신", 75), ("신생아", 75),
                    ("영유아", 75), ("보육", 70), ("양육", 70), ("육아", 70),
                    ("아이돌봄", 75), ("육아용품", 65),
                ],
            },
            KeywordTier {
                name: "protection",
                keywords: &[
                    ("가정폭력", 70), ("아동학대", 75), ("아동보호", 75), ("가족보호", 65),
                    ("한부모", 70), ("조손가정", 65), ("다문화가정", 65), ("입양", 60),
                    ("가정위탁", 60), ("이혼", 55), ("양육비", 65), ("면접교섭", 50),
                ],
            },
            KeywordTier {
                name: "formation",
                keywords: &[
                    ("결혼", 55), ("신혼부부", 60), ("청년", 50), ("혼인", 50),
                    ("가족구성", 45), ("동거", 40), ("사실혼", 45), ("가족관계", 40),
                ],
            },
            KeywordTier {
                name: "culture",
                keywords: &[
                    ("가족문화", 40), ("가족여가", 35), ("가족교육", 40), ("가족상담", 35),
                    ("가족치료", 40), ("부모교육", 35),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["모든가정", "전체가족", "전국"], multiplier: 1.4 },
            AudienceRule { phrases: &["영유아가정", "신생아가정"], multiplier: 1.3 },
            AudienceRule { phrases: &["한부모", "조손", "다문화"], multiplier: 1.3 },
            AudienceRule { phrases: &["맞벌이", "육아맘"], multiplier: 1.2 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "childcare" },
            TierLabel { min_score: 60, label: "protection" },
            TierLabel { min_score: 45, label: "formation" },
        ],
        fallback_label: "culture",
    },
    ScoringTable {
        category: Category::Housing,
        tiers: &[
            KeywordTier {
                name: "stability",
                keywords: &[
                    ("임대차", 85), ("전세", 80), ("월세", 80), ("임대료", 80), ("보증금", 75),
                    ("계약갱신", 75), ("주거안정", 85), ("강제퇴거", 80), ("임차인보호", 75),
                    ("공공임대", 70), ("사회주택", 70), ("임대주택", 70),
                ],
            },
            KeywordTier {
                name: "supply",
                keywords: &[
                    ("주택공급", 65), ("신규주택", 60), ("주택건설", 60), ("택지개발", 55),
                    ("도시개발", 55), ("재개발", 60), ("재건축", 60), ("주택용지", 50),
                    ("분양", 55),
                ],
            },
            KeywordTier {
                name: "market",
                keywords: &[
                    ("부동산가격", 55), ("주택가격", 60), ("집값", 60), ("매매", 50),
                    ("거래", 50), ("중개", 45), ("부동산중개", 45), ("공시지가", 45),
                    ("감정평가", 40),
                ],
            },
            KeywordTier {
                name: "environment",
                keywords: &[
                    ("주거환경", 45), ("주택성능", 40), ("에너지효율", 40), ("리모델링", 35),
                    ("주택개량", 35), ("주거복지", 50), ("주택품질", 40), ("건축", 35),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국민", "모든시민"], multiplier: 1.4 },
            AudienceRule { phrases: &["임차인", "세입자", "임대인"], multiplier: 1.3 },
            AudienceRule { phrases: &["청년", "신혼부부", "1인가구"], multiplier: 1.3 },
            AudienceRule { phrases: &["저소득", "취약계층"], multiplier: 1.4 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "stability" },
            TierLabel { min_score: 55, label: "supply" },
            TierLabel { min_score: 45, label: "market" },
        ],
        fallback_label: "environment",
    },
    ScoringTable {
        category: Category::Transport,
        tiers: &[
            KeywordTier {
                name: "safety",
                keywords: &[
                    ("교통사고", 90), ("안전운전", 85), ("교통안전", 85), ("음주운전", 80),
                    ("무면허", 75), ("과속", 75), ("신호위반", 70), ("보행자안전", 80),
                    ("어린이보호구역", 85), ("스쿨존", 85), ("횡단보도", 75), ("교통신호", 70),
                    ("자동차안전", 70), ("차량검사", 65), ("안전벨트", 65),
                ],
            },
            KeywordTier {
                name: "cost",
                keywords: &[
                    ("대중교통요금", 70), ("지하철요금", 70), ("버스요금", 70), ("택시요금", 65),
                    ("통행료", 65), ("주차요금", 60), ("교통카드", 60), ("교통비", 65),
                    ("유류비", 60), ("자동차세", 55), ("교통세", 55),
                ],
            },
            KeywordTier {
                name: "convenience",
                keywords: &[
                    ("대중교통", 55), ("지하철", 50), ("버스", 50), ("교통편의", 50),
                    ("환승", 45), ("교통카드", 45), ("교통정보", 40), ("길안내", 35),
                    ("교통앱", 35), ("무장애", 55), ("교통약자", 60), ("휠체어", 55),
                    ("저상버스", 50), ("엘리베이터", 45),
                ],
            },
            KeywordTier {
                name: "environment",
                keywords: &[
                    ("친환경교통", 45), ("전기차", 40), ("수소차", 40), ("자전거", 40),
                    ("도보", 35), ("보행", 40), ("교통체계", 35), ("교통계획", 30),
                    ("도로건설", 35), ("교통인프라", 40), ("스마트교통", 35),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국민", "모든시민", "전체"], multiplier: 1.4 },
            AudienceRule { phrases: &["운전자", "보행자", "승객"], multiplier: 1.3 },
            AudienceRule { phrases: &["교통약자", "장애인", "고령자"], multiplier: 1.3 },
            AudienceRule { phrases: &["어린이", "학생", "청소년"], multiplier: 1.3 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "safety" },
            TierLabel { min_score: 60, label: "cost" },
            TierLabel { min_score: 45, label: "convenience" },
        ],
        fallback_label: "environment",
    },
    ScoringTable {
        category: Category::Environment,
        tiers: &[
            KeywordTier {
                name: "life_threatening",
                keywords: &[
                    ("화학물질", 95), ("독성물질", 95), ("방사능", 95), ("대기오염", 85),
                    ("미세먼지", 85), ("초미세먼지", 85), ("수질오염", 80), ("식수", 85),
                    ("상수도", 80), ("토양오염", 75), ("소음", 70), ("진동", 65),
                    ("석면", 90), ("중금속", 85), ("발암물질", 90),
                ],
            },
            KeywordTier {
                name: "protection",
                keywords: &[
                    ("기후변화", 70), ("온실가스", 70), ("탄소배출", 65), ("재생에너지", 60),
                    ("에너지효율", 55), ("친환경", 60), ("생물다양성", 55), ("생태계", 60),
                    ("자연보호", 55), ("산림", 50), ("해양", 55), ("습지", 50),
                    ("환경보전", 65), ("환경복원", 60),
                ],
            },
            KeywordTier {
                name: "disaster",
                keywords: &[
                    ("자연재해", 80), ("태풍", 75), ("홍수", 80), ("지진", 85), ("산사태", 75),
                    ("가뭄", 70), ("화재", 80), ("폭발", 85), ("누출", 80), ("환경사고", 75),
                    ("재해대응", 75), ("응급대응", 80), ("대피", 75), ("구조", 80),
                ],
            },
            KeywordTier {
                name: "management",
                keywords: &[
                    ("환경영향평가", 50), ("환경기준", 45), ("배출기준", 50), ("환경감시", 45),
                    ("환경모니터링", 45), ("환경조사", 40), ("폐기물", 55), ("재활용", 50),
                    ("순환경제", 45), ("환경교육", 40), ("환경정보", 35),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국민", "모든시민", "전국"], multiplier: 1.4 },
            AudienceRule { phrases: &["지역주민", "인근주민"], multiplier: 1.3 },
            AudienceRule { phrases: &["어린이", "임산부", "노인"], multiplier: 1.3 },
            AudienceRule { phrases: &["근로자", "작업자"], multiplier: 1.2 },
        ],
        direction: &[],
        // "disaster" sits after "protection", so it is never selected: any
        // score reaching 70 is already labelled "protection".
        labels: &[
            TierLabel { min_score: 80, label: "life_threatening" },
            TierLabel { min_score: 60, label: "protection" },
            TierLabel { min_score: 70, label: "disaster" },
        ],
        fallback_label: "management",
    },
    ScoringTable {
        category: Category::Culture,
        tiers: &[
            KeywordTier {
                name: "accessibility",
                keywords: &[
                    ("문화향유", 75), ("문화접근", 70), ("문화복지", 70), ("문화바우처", 65),
                    ("문화이용료", 65), ("관람료", 60), ("무료관람", 70), ("할인", 60),
                    ("문화시설", 60), ("도서관", 65), ("박물관", 60), ("미술관", 60),
                    ("문화센터", 55), ("공연장", 55), ("영화관", 50),
                ],
            },
            KeywordTier {
                name: "diversity",
                keywords: &[
                    ("다문화", 65), ("문화다양성", 65), ("소수문화", 60), ("지역문화", 60),
                    ("전통문화", 60), ("민속", 55), ("문화정체성", 55), ("문화교류", 50),
                    ("국제문화", 50), ("청소년문화", 55), ("노인문화", 50), ("장애인문화", 60),
                ],
            },
            KeywordTier {
                name: "industry",
                keywords: &[
                    ("한류", 50), ("콘텐츠", 50), ("문화산업", 50), ("게임", 45), ("영화", 45),
                    ("음악", 45), ("방송", 40), ("출판", 40), ("만화", 35), ("문화기술", 45),
                    ("디지털문화", 45), ("K-pop", 50),
                ],
            },
            KeywordTier {
                name: "heritage",
                keywords: &[
                    ("문화재", 60), ("문화유산", 60), ("유적", 55), ("문화재보호", 55),
                    ("전통건축", 50), ("민속자료", 45), ("무형문화재", 55), ("전통예술", 50),
                    ("전통기술", 45), ("문화재복원", 50), ("문화재관리", 45),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국민", "모든시민", "전체"], multiplier: 1.3 },
            AudienceRule { phrases: &["저소득", "취약계층", "소외계층"], multiplier: 1.4 },
            AudienceRule { phrases: &["청소년", "아동", "학생"], multiplier: 1.2 },
            AudienceRule { phrases: &["노인", "장애인", "다문화"], multiplier: 1.3 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 60, label: "accessibility" },
            TierLabel { min_score: 55, label: "diversity" },
            TierLabel { min_score: 45, label: "industry" },
        ],
        fallback_label: "heritage",
    },
    ScoringTable {
        category: Category::Business,
        tiers: &[
            KeywordTier {
                name: "sme_support",
                keywords: &[
                    ("소상공인", 85), ("중소기업", 80), ("자영업", 80), ("소기업", 75),
                    ("마이크로", 75), ("1인기업", 70), ("중소기업지원", 80), ("소상공인지원", 85),
                    ("자영업지원", 80), ("경영지원", 65), ("기술지원", 60), ("자금지원", 75),
                    ("대출", 70), ("신용보증", 70), ("정책자금", 65),
                ],
            },
            KeywordTier {
                name: "startup",
                keywords: &[
                    ("창업", 70), ("스타트업", 70), ("창업지원", 70), ("창업자금", 65),
                    ("창업교육", 55), ("창업보육", 60), ("벤처기업", 65), ("기술창업", 60),
                    ("청년창업", 70), ("창업인큐베이터", 55), ("액셀러레이터", 50), ("펀딩", 60),
                ],
            },
            KeywordTier {
                name: "environment",
                keywords: &[
                    ("사업환경", 60), ("영업환경", 55), ("경영환경", 55), ("규제완화", 60),
                    ("규제개선", 55), ("행정절차", 50), ("인허가", 55), ("사업허가", 55),
                    ("영업허가", 50), ("온라인신청", 45), ("원스톱", 50), ("디지털", 45),
                    ("전자상거래", 50), ("온라인사업", 50),
                ],
            },
            KeywordTier {
                name: "regulation",
                keywords: &[
                    ("공정거래", 40), ("불공정거래", 45), ("독점", 45), ("담합", 40),
                    ("시장지배", 35), ("경쟁제한", 35), ("소비자보호", 50), ("소비자피해", 50),
                    ("환불", 45), ("품질보증", 40), ("하자보수", 40), ("AS", 35),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["모든사업자", "전체기업", "전국"], multiplier: 1.3 },
            AudienceRule { phrases: &["소상공인", "자영업자", "1인기업"], multiplier: 1.4 },
            AudienceRule { phrases: &["중소기업", "소기업"], multiplier: 1.3 },
            AudienceRule { phrases: &["창업자", "청년창업"], multiplier: 1.3 },
            AudienceRule { phrases: &["대기업", "대규모기업"], multiplier: 1.0 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 70, label: "sme_support" },
            TierLabel { min_score: 60, label: "startup" },
            TierLabel { min_score: 50, label: "environment" },
        ],
        fallback_label: "regulation",
    },
    ScoringTable {
        category: Category::Special,
        tiers: &[
            KeywordTier {
                name: "national_security",
                keywords: &[
                    ("국가기밀", 90), ("안보", 90), ("국방", 85), ("군사", 85), ("첩보", 85),
                    ("보안", 80), ("외교", 80), ("국익", 80), ("테러", 85), ("간첩", 85),
                    ("국가정보", 80),
                ],
            },
            KeywordTier {
                name: "public_safety",
                keywords: &[
                    ("재해대응", 70), ("재난", 70), ("응급상황", 70), ("화재", 65), ("지진", 65),
                    ("홍수", 65), ("태풍", 65), ("식품안전", 60), ("환경오염", 60),
                    ("방사능", 70), ("전염병", 65), ("공중보건", 60),
                ],
            },
            KeywordTier {
                name: "professional_tech",
                keywords: &[
                    ("연구개발", 50), ("기술개발", 50), ("특허", 45), ("지식재산", 45),
                    ("기술이전", 40), ("혁신", 45), ("인공지능", 45), ("빅데이터", 40),
                    ("블록체인", 40), ("바이오", 45), ("우주", 50), ("원자력", 55),
                ],
            },
            KeywordTier {
                name: "administrative",
                keywords: &[
                    ("행정절차", 35), ("전자정부", 35), ("디지털정부", 40), ("규제개혁", 40),
                    ("행정효율", 35), ("민원", 30), ("정부조직", 30), ("공무원", 30),
                    ("인사", 25),
                ],
            },
        ],
        audience: &[
            AudienceRule { phrases: &["전국", "전면", "전체", "국가적"], multiplier: 1.3 },
            AudienceRule { phrases: &["지역", "부문", "분야"], multiplier: 1.1 },
        ],
        direction: &[],
        labels: &[
            TierLabel { min_score: 80, label: "national_security" },
            TierLabel { min_score: 60, label: "public_safety" },
            TierLabel { min_score: 40, label: "professional_tech" },
        ],
        fallback_label: "administrative",
    },
];

// ── General (ETC) scorer ──

/// Weights for the department-driven fallback scorer.
#[derive(Debug, Serialize)]
pub struct GeneralTable {
    pub department_base: &'static [(&'static str, f64)],
    pub default_base: f64,
    pub law_type_factor: &'static [(&'static str, f64)],
    pub revision_type_factor: &'static [(&'static str, f64)],
    /// Every keyword present adds its bonus.
    pub keyword_bonus: &'static [(&'static str, f64)],
    pub label: &'static str,
}

pub static GENERAL: GeneralTable = GeneralTable {
    department_base: &[
        ("보건복지부", 60.0), ("기획재정부", 55.0), ("고용노동부", 55.0), ("교육부", 50.0),
        ("여성가족부", 50.0), ("국토교통부", 45.0), ("환경부", 45.0), ("문화체육관광부", 40.0),
        ("농림축산식품부", 40.0), ("산업통상자원부", 40.0), ("과학기술정보통신부", 35.0),
        ("행정안전부", 35.0), ("법무부", 30.0), ("외교부", 25.0), ("국방부", 25.0),
        ("통일부", 20.0),
    ],
    default_base: 30.0,
    law_type_factor: &[("법률", 1.3), ("대통령령", 1.2), ("총리령", 1.1)],
    revision_type_factor: &[("제정", 1.2), ("전부개정", 1.15), ("일부개정", 1.1)],
    keyword_bonus: &[
        ("국민", 10.0), ("시민", 8.0), ("전국", 8.0), ("전체", 6.0), ("확대", 5.0),
        ("신설", 6.0), ("강화", 4.0), ("개선", 4.0), ("지원", 5.0), ("혜택", 4.0),
        ("서비스", 3.0), ("편의", 3.0),
    ],
    label: "general",
};

/// Exact-match lookup in a `(key, value)` table.
pub fn lookup(table: &[(&str, f64)], key: &str) -> Option<f64> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// ── Impact keywords ──

/// Generic change phrases reported alongside a ranked document, in report order.
pub const IMPACT_KEYWORDS: [&str; 9] = [
    "확대", "신설", "지원", "강화", "개선", "완화", "폐지", "인상", "인하",
];

/// At most this many impact keywords are reported per document.
pub const MAX_IMPACT_KEYWORDS: usize = 5;

// ── Audit ──

/// Serializable view of every table, for dumping and review.
#[derive(Debug, Serialize)]
pub struct TableSnapshot {
    pub version: &'static str,
    pub classifier: &'static [ClassifierRule],
    pub scorers: &'static [ScoringTable],
    pub general: &'static GeneralTable,
    pub impact_keywords: &'static [&'static str],
}

pub fn snapshot() -> TableSnapshot {
    TableSnapshot {
        version: TABLES_VERSION,
        classifier: &CLASSIFIER_RULES,
        scorers: &SCORING_TABLES,
        general: &GENERAL,
        impact_keywords: &IMPACT_KEYWORDS,
    }
}
