#![allow(missing_docs)]

use axum::{
    http::{
        HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::IntoResponse,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_test::{TestRequest, TestServer};
use rusqlite::Connection;
use time::Date;

use crate::{
    Amount, AppState, Category, DEFAULT_COOKIE_DURATION, Expense, OwnerId, PaginationConfig,
    Title, build_router,
    db::initialize,
    expense::insert_expense,
    set_session_cookie,
};

pub(crate) const TEST_SECRET: &str = "foobarbazquxgobbledygook";

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&connection).expect("could not initialize test DB");

    connection
}

#[track_caller]
pub(crate) fn cents(cents: i64) -> Amount {
    Amount::from_cents(cents).expect("test amounts must not be negative")
}

/// Insert an expense with the fields the query tests care about.
#[track_caller]
pub(crate) fn insert_test_expense(
    owner: OwnerId,
    title: &str,
    amount_cents: i64,
    category: Category,
    date: Date,
    connection: &Connection,
) -> Expense {
    insert_expense(
        owner,
        &Expense::build(Title::new_unchecked(title), cents(amount_cents), date).category(category),
        connection,
    )
    .expect("could not insert test expense")
}

#[track_caller]
pub(crate) fn must_create_test_state(connection: Connection) -> AppState {
    AppState::new(
        connection,
        TEST_SECRET,
        "Etc/UTC",
        PaginationConfig::default(),
    )
    .expect("could not create test app state")
}

/// The cookie header value for a valid session of `owner`.
#[track_caller]
pub(crate) fn session_cookie_header(state: &AppState, owner: OwnerId) -> String {
    let jar = PrivateCookieJar::new(Key::clone(&state.cookie_key));
    let response = set_session_cookie(jar, owner, DEFAULT_COOKIE_DURATION)
        .expect("could not set session cookie")
        .into_response();

    // Keep only the encrypted `name=value` pair of each Set-Cookie header.
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Attach a session for `owner` to a test request.
#[track_caller]
pub(crate) fn with_session(request: TestRequest, state: &AppState, owner: OwnerId) -> TestRequest {
    let cookie = session_cookie_header(state, owner);

    request.add_header(
        COOKIE,
        HeaderValue::from_str(&cookie).expect("cookie should be a valid header value"),
    )
}

/// Poison the database mutex by panicking in another thread while it holds
/// the lock.
#[track_caller]
pub(crate) fn poison_db_lock(state: &AppState) {
    let connection = state.db_connection.clone();

    let result = std::thread::spawn(move || {
        let _guard = connection.lock().expect("lock should not be poisoned yet");
        panic!("panicking while holding the database lock");
    })
    .join();

    assert!(result.is_err(), "the locking thread should have panicked");
    assert!(state.db_connection.is_poisoned());
}

/// A test server for the full router.
#[track_caller]
pub(crate) fn must_create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).expect("could not create test server")
}
