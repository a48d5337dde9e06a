//! Assembles the data for a monthly report.

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error, Expense, MonthRange, OwnerId,
    expense::{ExpenseFilter, SortOrder, find_expenses, sum_by_category},
    summary::{Summary, build_summary},
};

/// Everything needed to render the report for one owner and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The owner the report was generated for.
    pub owner: OwnerId,
    /// The month the report covers.
    pub month: MonthRange,
    /// When the report was generated, in the server's local timezone.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// The totals for the month.
    pub summary: Summary,
    /// Every expense in the month, oldest first.
    pub ordered_expenses: Vec<Expense>,
}

/// Build the report of the expenses owned by `owner` in `month`.
///
/// The expense list and the summary are read with the same `connection` and
/// filter, so the expense amounts always add up to the summary total when the
/// caller holds the database lock for the whole call.
///
/// # Errors
/// This function will return a:
/// - [Error::SqlError] if there is an SQL error,
/// - or [Error::AmountOverflow] if the total does not fit in an amount.
pub fn build_report(
    owner: OwnerId,
    month: MonthRange,
    generated_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Report, Error> {
    let filter = ExpenseFilter::month(month);

    let ordered_expenses = find_expenses(owner, &filter, SortOrder::Ascending, None, connection)?;
    let summary = build_summary(month, sum_by_category(owner, &filter, connection)?)?;

    Ok(Report {
        owner,
        month,
        generated_at,
        summary,
        ordered_expenses,
    })
}
