use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Expense, ExpenseId, OwnerId,
    json::{JsonBody, PathParam},
};

use super::{db::update_expense, request::ExpenseRequest};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for changing some fields of an expense, responds with the
/// updated expense.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(owner): Extension<OwnerId>,
    PathParam(expense_id): PathParam<ExpenseId>,
    JsonBody(request): JsonBody<ExpenseRequest>,
) -> Result<Json<Expense>, Error> {
    let patch = request.into_patch()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_expense(owner, expense_id, &patch, &connection).map(Json)
}
