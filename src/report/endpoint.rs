use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error, MonthRange, OwnerId, json::QueryParams, timezone::get_local_offset,
};

use super::{build_report, render_report_html};

/// The state needed to generate a monthly report.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading expenses.
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for the monthly report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// The month to report on as `YYYY-MM`. Required.
    month: Option<String>,
    /// Either "json" (the default) or "html".
    format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Json,
    Html,
}

impl ReportFormat {
    fn parse(format: Option<&str>) -> Result<Self, Error> {
        match format.map(str::trim) {
            None | Some("") | Some("json") => Ok(Self::Json),
            Some("html") => Ok(Self::Html),
            Some(other) => Err(Error::validation(
                "format",
                format!("\"{other}\" is not a report format, expected json or html"),
            )),
        }
    }
}

/// A route handler for the monthly report of the owner's expenses.
///
/// Responds with the report as JSON, or as an HTML attachment named
/// `expense-report-YYYY-MM.html` when `format=html`.
pub async fn get_monthly_report_endpoint(
    State(state): State<ReportState>,
    Extension(owner): Extension<OwnerId>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Result<Response, Error> {
    let month = MonthRange::required(query.month.as_deref())?;
    let format = ReportFormat::parse(query.format.as_deref())?;

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;
    let generated_at = OffsetDateTime::now_utc().to_offset(local_offset);

    let report = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        build_report(owner, month, generated_at, &connection)?
    };

    let response = match format {
        ReportFormat::Json => Json(report).into_response(),
        ReportFormat::Html => (
            [
                (CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"expense-report-{month}.html\""),
                ),
            ],
            render_report_html(&report).into_string(),
        )
            .into_response(),
    };

    Ok(response)
}
