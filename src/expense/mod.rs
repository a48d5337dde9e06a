//! Expenses: the data model, storage, querying and the HTTP endpoints.

mod category;
mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod get_endpoint;
mod list_endpoint;
mod query;
mod request;

pub use category::{ALL_CATEGORIES, Category};
pub use core::{Expense, ExpenseId, ExpensePatch, NewExpense, Title};
pub use create_endpoint::create_expense_endpoint;
pub use db::{
    SortOrder, Window, count_expenses, create_expense_table, delete_expense, find_expense,
    find_expenses, insert_expense, sum_by_category, update_expense,
};
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use filter::ExpenseFilter;
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use query::{ExpensePage, list_expenses};
