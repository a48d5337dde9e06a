use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::{HeaderName, StatusCode, header::LOCATION},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Expense, OwnerId,
    endpoints::{self, format_endpoint},
    json::JsonBody,
};

use super::{db::insert_expense, request::ExpenseRequest};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording a new expense, responds with the stored
/// expense and its URI in the `Location` header.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(owner): Extension<OwnerId>,
    JsonBody(request): JsonBody<ExpenseRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Expense>), Error> {
    let new_expense = request.into_new_expense()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = insert_expense(owner, &new_expense, &connection)?;

    let location = format_endpoint(endpoints::EXPENSE, expense.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(expense)))
}
