//! Classification, priority scoring and top-K selection.
//!
//! Everything here is a pure function over in-memory documents; the keyword
//! tables live in [`keywords`] as inspectable data.

pub mod classifier;
pub mod impact;
pub mod keywords;
pub mod ranker;
pub mod scorer;

pub use classifier::{CategoryAssignment, classify};
pub use impact::extract_impact_keywords;
pub use keywords::{TABLES_VERSION, snapshot};
pub use ranker::{
    DEFAULT_TOP_K, Ranking, ScoredDocument, category_counts, rank_and_select, score_all,
    to_rank_slots,
};
pub use scorer::{MAX_SCORE, PriorityScore, score, score_code};
