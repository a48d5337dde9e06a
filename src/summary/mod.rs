//! Monthly spending totals, overall and per category.

mod aggregation;
mod endpoint;

pub use aggregation::{CategoryTotal, Summary, summarize};
pub use endpoint::get_summary_endpoint;

pub(crate) use aggregation::build_summary;
