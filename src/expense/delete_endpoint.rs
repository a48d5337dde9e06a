use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, Error, Expense, ExpenseId, OwnerId, json::PathParam};

use super::db::delete_expense;

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, responds with the deleted expense.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(owner): Extension<OwnerId>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = delete_expense(owner, expense_id, &connection)?;
    tracing::info!("deleted expense {expense_id} for {owner}");

    Ok(Json(expense))
}
