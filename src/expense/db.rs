//! Database queries for expenses.
//!
//! Every query takes the owner and restricts its `WHERE` clause to that
//! owner's rows, so an ID that belongs to someone else is indistinguishable
//! from an ID that does not exist.

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Amount, Error, OwnerId,
    expense::{Expense, ExpenseId, ExpensePatch, NewExpense},
    summary::CategoryTotal,
};

use super::filter::ExpenseFilter;

/// The columns of an expense row in the order expected by [map_expense_row].
const EXPENSE_COLUMNS: &str =
    "id, owner_id, title, amount, category, date, description, created_at, updated_at";

/// The order to sort expenses by date.
///
/// Expenses on the same date are always ordered by ID, i.e. creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Most recent first.
    Descending,
}

impl SortOrder {
    fn order_by_clause(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ORDER BY date ASC, id ASC",
            SortOrder::Descending => "ORDER BY date DESC, id ASC",
        }
    }
}

/// A slice of a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// The number of rows to skip.
    pub skip: u64,
    /// The maximum number of rows to return.
    pub limit: u64,
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                amount INTEGER NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL DEFAULT 'Other',
                date TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every query filters by owner and most filter by a date range.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_owner_date ON expense(owner_id, date);",
        (),
    )?;

    Ok(())
}

/// Insert a new expense for `owner`.
///
/// `created_at` and `updated_at` are both set to the current time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn insert_expense(
    owner: OwnerId,
    new_expense: &NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO expense (owner_id, title, amount, category, date, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            params![
                owner,
                new_expense.title,
                new_expense.amount,
                new_expense.category,
                new_expense.date,
                new_expense.description,
                now,
            ],
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Retrieve the expense with `id` owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn find_expense(
    owner: OwnerId,
    id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = ?1 AND owner_id = ?2"
        ))?
        .query_row(params![id, owner], map_expense_row)
        .map_err(Error::from)
}

/// Get the expenses owned by `owner` that match `filter`, sorted by date.
///
/// If `window` is `None`, every matching expense is returned.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn find_expenses(
    owner: OwnerId,
    filter: &ExpenseFilter,
    sort_order: SortOrder,
    window: Option<Window>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let (where_clause, mut params) = filter.to_sql(owner);

    let limit_clause = match window {
        Some(window) => {
            params.push(Value::Integer(clamp_to_i64(window.limit)));
            params.push(Value::Integer(clamp_to_i64(window.skip)));
            "LIMIT ? OFFSET ?"
        }
        None => "",
    };

    let query = format!(
        "SELECT {EXPENSE_COLUMNS} FROM expense WHERE {where_clause} {} {limit_clause}",
        sort_order.order_by_clause()
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::from))
        .collect()
}

/// Count the expenses owned by `owner` that match `filter`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_expenses(
    owner: OwnerId,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, params) = filter.to_sql(owner);

    let count: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM expense WHERE {where_clause}"),
        params_from_iter(params),
        |row| row.get(0),
    )?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Apply `patch` to the expense with `id` owned by `owner`.
///
/// Only the fields present in `patch` change. `updated_at` is always set to
/// the current time.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_expense(
    owner: OwnerId,
    id: ExpenseId,
    patch: &ExpensePatch,
    connection: &Connection,
) -> Result<Expense, Error> {
    let mut expense = find_expense(owner, id, connection)?;
    patch.apply_to(&mut expense);

    connection
        .prepare(&format!(
            "UPDATE expense
            SET \
                title = ?1, \
                amount = ?2, \
                category = ?3, \
                date = ?4, \
                description = ?5, \
                updated_at = ?6 \
            WHERE id = ?7 AND owner_id = ?8
            RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            params![
                expense.title,
                expense.amount,
                expense.category,
                expense.date,
                expense.description,
                OffsetDateTime::now_utc(),
                id,
                owner,
            ],
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Delete the expense with `id` owned by `owner`, returning the deleted expense.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `owner`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_expense(
    owner: OwnerId,
    id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "DELETE FROM expense WHERE id = ?1 AND owner_id = ?2 RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(params![id, owner], map_expense_row)
        .map_err(Error::from)
}

/// Sum the amounts of the expenses owned by `owner` that match `filter`,
/// grouped by category.
///
/// Categories without matching expenses are omitted. Groups are returned in
/// the order their categories were first used, i.e. by the lowest expense ID
/// in each group.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// including when a total overflows.
pub fn sum_by_category(
    owner: OwnerId,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let (where_clause, params) = filter.to_sql(owner);

    connection
        .prepare(&format!(
            "SELECT category, SUM(amount) AS total, MIN(id) AS first_id FROM expense \
            WHERE {where_clause} \
            GROUP BY category \
            ORDER BY first_id ASC"
        ))?
        .query_map(params_from_iter(params), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total_amount: row.get::<_, Amount>(1)?,
            })
        })?
        .map(|total_result| total_result.map_err(Error::from))
        .collect()
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
