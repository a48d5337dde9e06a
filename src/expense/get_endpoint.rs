use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, Error, Expense, ExpenseId, OwnerId, json::PathParam};

use super::db::find_expense;

/// The state needed to get an expense.
#[derive(Debug, Clone)]
pub struct GetExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting one of the owner's expenses.
pub async fn get_expense_endpoint(
    State(state): State<GetExpenseState>,
    Extension(owner): Extension<OwnerId>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    find_expense(owner, expense_id, &connection).map(Json)
}
