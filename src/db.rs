//! Database setup for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior, functions::FunctionFlags};

use crate::expense::create_expense_table;

/// The SQL function that lowercases text with Unicode case rules.
///
/// SQLite's built-in `lower` and `LIKE` only fold ASCII letters.
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";

/// Register the application's SQL functions and create its tables if they
/// do not exist yet.
///
/// Functions are registered per connection, so this must be called on every
/// new connection. Safe to call on a database that has already been
/// initialized.
///
/// # Errors
/// Returns an error if a function cannot be registered, a table cannot be
/// created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    register_functions(connection)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text: Option<String> = context.get(0)?;

            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}
