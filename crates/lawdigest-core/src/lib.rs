pub mod category;
pub mod document;
pub mod normalize;
pub mod period;
pub mod schema;

pub use category::{Category, UnknownCategory};
pub use document::{NormalizedDocument, RankSlot};
pub use normalize::{NormalizeError, normalize_document};
pub use period::{PeriodError, ProcessingPeriod};
