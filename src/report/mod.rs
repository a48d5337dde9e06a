//! The monthly expense report: a chronological list of the month's expenses
//! alongside its summary.

mod assemble;
mod endpoint;
mod view;

pub use assemble::{Report, build_report};
pub use endpoint::get_monthly_report_endpoint;
pub use view::render_report_html;
