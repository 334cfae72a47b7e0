pub mod compare;
pub mod recommend;
pub mod search;

pub use compare::{
    compare, other_stores, parse_ids, select_by_ids, ComparisonReport, PriceGroup, TargetCoverage,
};
pub use recommend::recommend;
pub use search::search;
