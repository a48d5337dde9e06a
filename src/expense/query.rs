//! Paged, filtered listing of an owner's expenses.

use rusqlite::Connection;

use crate::{Error, Expense, OwnerId, pagination::Pagination};

use super::{
    db::{SortOrder, Window, count_expenses, find_expenses},
    filter::ExpenseFilter,
};

/// One page of an owner's expenses, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePage {
    /// The expenses on this page.
    pub items: Vec<Expense>,
    /// The one-based number of this page.
    pub page: u64,
    /// How many pages the filtered expenses span. Zero when nothing matches.
    pub total_pages: u64,
    /// How many expenses match the filter across all pages.
    pub total_count: u64,
}

/// Get one page of the expenses owned by `owner` that match `filter`.
///
/// Expenses are sorted by date descending, and expenses on the same date are
/// kept in creation order. A page past the last page has no items but still
/// reports the page count and total.
///
/// The count and the page are read from the same `connection`, so callers
/// should hold the database lock for the whole call.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_expenses(
    owner: OwnerId,
    filter: &ExpenseFilter,
    pagination: Pagination,
    connection: &Connection,
) -> Result<ExpensePage, Error> {
    let total_count = count_expenses(owner, filter, connection)?;
    let offset = pagination.offset();

    let items = if offset >= total_count {
        Vec::new()
    } else {
        find_expenses(
            owner,
            filter,
            SortOrder::Descending,
            Some(Window {
                skip: offset,
                limit: pagination.limit,
            }),
            connection,
        )?
    };

    Ok(ExpensePage {
        items,
        page: pagination.page,
        total_pages: pagination.page_count(total_count),
        total_count,
    })
}
