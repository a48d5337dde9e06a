use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, MonthRange, OwnerId, json::QueryParams};

use super::{Summary, summarize};

/// The state needed to summarize expenses.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// The month to summarize as `YYYY-MM`. Required.
    month: Option<String>,
}

/// A route handler for the monthly summary of the owner's expenses.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(owner): Extension<OwnerId>,
    QueryParams(query): QueryParams<SummaryQuery>,
) -> Result<Json<Summary>, Error> {
    let month = MonthRange::required(query.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = summarize(owner, month, &connection)?;

    Ok(Json(summary))
}
