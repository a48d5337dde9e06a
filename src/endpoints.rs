//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route for the monthly summary of expenses.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary";
/// The route to get, update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for the monthly expense report.
pub const MONTHLY_REPORT: &str = "/api/reports/monthly";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// Replace the first `{parameter}` in `endpoint_path` with `id`, e.g.
/// `/api/expenses/{expense_id}` becomes `/api/expenses/42`.
///
/// Returns `endpoint_path` unchanged if it has no parameter. An unclosed
/// parameter runs to the end of the path.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}
