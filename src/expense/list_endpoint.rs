use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, Expense, OwnerId, PaginationConfig, json::QueryParams};

use super::{
    filter::ExpenseFilter,
    query::{ExpensePage, list_expenses},
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page sizes.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config,
        }
    }
}

/// The query string for listing expenses. Every parameter is optional.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    month: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
    search: Option<String>,
    category: Option<String>,
}

/// One page of expenses as sent to the client.
#[derive(Debug, Serialize)]
pub struct ListExpensesResponse {
    expenses: Vec<Expense>,
    page: u64,
    pages: u64,
    total: u64,
}

impl From<ExpensePage> for ListExpensesResponse {
    fn from(page: ExpensePage) -> Self {
        Self {
            expenses: page.items,
            page: page.page,
            pages: page.total_pages,
            total: page.total_count,
        }
    }
}

/// A route handler for listing the owner's expenses, most recent first.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Extension(owner): Extension<OwnerId>,
    QueryParams(query): QueryParams<ListExpensesQuery>,
) -> Result<Json<ListExpensesResponse>, Error> {
    let filter = ExpenseFilter::parse(
        query.month.as_deref(),
        query.search.as_deref(),
        query.category.as_deref(),
    )?;
    let pagination = state.pagination_config.resolve(query.page, query.limit)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let page = list_expenses(owner, &filter, pagination, &connection)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState, Category, OwnerId, endpoints,
        test_utils::{
            insert_test_expense, must_create_test_connection, must_create_test_server,
            must_create_test_state, poison_db_lock, with_session,
        },
    };

    const OWNER: OwnerId = OwnerId::new(1);

    fn create_server_with_example_expenses() -> (TestServer, AppState) {
        let conn = must_create_test_connection();
        insert_test_expense(OWNER, "Groceries", 1000, Category::Food, date!(2024 - 02 - 01), &conn);
        insert_test_expense(OWNER, "Lunch", 500, Category::Food, date!(2024 - 02 - 29), &conn);
        insert_test_expense(OWNER, "Power", 2000, Category::Bills, date!(2024 - 03 - 01), &conn);
        insert_test_expense(
            OwnerId::new(2),
            "Not mine",
            100,
            Category::Other,
            date!(2024 - 02 - 10),
            &conn,
        );
        let state = must_create_test_state(conn);

        (must_create_test_server(state.clone()), state)
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["expenses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|expense| expense["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn lists_first_page_of_month() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("month", "2024-02")
            .add_query_param("page", 1)
            .add_query_param("limit", 1)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(titles(&body), vec!["Lunch"]);
        assert_eq!(body["page"], 1);
        assert_eq!(body["pages"], 2);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn lists_all_owned_expenses_without_filters() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(titles(&body), vec!["Power", "Lunch", "Groceries"]);
        assert_eq!(body["total"], 3);
        assert_eq!(body["pages"], 1);
    }

    #[tokio::test]
    async fn filters_by_search_and_category() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("search", "LUNCH")
            .add_query_param("category", "Food")
            .await;

        response.assert_status_ok();
        assert_eq!(titles(&response.json::<Value>()), vec!["Lunch"]);
    }

    #[tokio::test]
    async fn empty_result_has_zero_pages() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("month", "1999-12")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "expenses": [], "page": 1, "pages": 0, "total": 0 }));
    }

    #[tokio::test]
    async fn unknown_category_is_bad_request() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("category", "Travel")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "category");
    }

    #[tokio::test]
    async fn page_zero_is_bad_request() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("page", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "page");
    }

    #[tokio::test]
    async fn non_numeric_limit_is_bad_request() {
        let (server, state) = create_server_with_example_expenses();

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER)
            .add_query_param("limit", "lots")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["field"], "query");
    }

    #[tokio::test]
    async fn poisoned_database_lock_is_internal_server_error() {
        let (server, state) = create_server_with_example_expenses();
        poison_db_lock(&state);

        let response = with_session(server.get(endpoints::EXPENSES), &state, OWNER).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "internal server error" }));
    }
}
