//! Expense Tracker is a web service for recording personal expenses.
//!
//! Users record expenses, filter, search and page through them, view monthly
//! summaries broken down by category, and export a monthly report.
//!
//! This library provides a JSON REST API. Sessions are issued by an external
//! authentication service and verified here with a shared secret.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod auth;
mod db;
pub mod endpoints;
pub mod expense;
mod json;
mod logging;
mod month;
mod owner;
mod pagination;
pub mod report;
mod routing;
pub mod summary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use amount::Amount;
pub use app_state::AppState;
pub use auth::{DEFAULT_COOKIE_DURATION, set_session_cookie};
pub use db::initialize as initialize_db;
pub use expense::{Category, Expense, ExpenseId, ExpensePatch, NewExpense, Title};
pub use logging::logging_middleware;
pub use month::MonthRange;
pub use owner::OwnerId;
pub use pagination::PaginationConfig;
pub use report::Report;
pub use routing::build_router;
pub use summary::{CategoryTotal, Summary};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for ctrl+c: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required input was missing or malformed.
    ///
    /// `field` names the offending input so that clients can point the user
    /// at it, e.g. "month" or "amount".
    #[error("invalid {field}: {message}")]
    Validation {
        /// The name of the invalid field.
        field: &'static str,
        /// A human readable description of the problem.
        message: String,
    },

    /// The requested resource was not found.
    ///
    /// Records owned by another user are reported with this same error so
    /// that clients cannot tell them apart from records that do not exist.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The session cookie is missing, could not be decrypted, or has expired.
    #[error("missing or invalid session")]
    Unauthorized,

    /// Summing amounts exceeded the range of the underlying integer type.
    #[error("the sum of the amounts is too large")]
    AmountOverflow,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    SessionCookie(String),
}

impl Error {
    /// Create a [Error::Validation] for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::validation("path", rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "error": message, "field": field })),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                axum::Json(json!({ "error": "expense not found" })),
            )
                .into_response(),
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({ "error": "not authorized" })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            // This is the one place where unexpected errors are logged.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
