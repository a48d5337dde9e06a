//! The JSON body accepted when creating or editing an expense.

use serde::Deserialize;
use time::Date;

use crate::{Amount, Error, month::date_format};

use super::{Category, Expense, ExpensePatch, NewExpense, Title};

/// The fields of an expense sent by a client.
///
/// Every field is optional here so that a missing or malformed field is
/// reported by name instead of as an unreadable body.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    title: Option<String>,
    amount: Option<serde_json::Value>,
    category: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

impl ExpenseRequest {
    /// Validate the request as a new expense.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] naming the first field that is missing
    /// or invalid. `title`, `amount` and `date` are required and `amount`
    /// must be greater than zero.
    pub fn into_new_expense(self) -> Result<NewExpense, Error> {
        let title = Title::new(&required("title", self.title)?)?;
        let amount = parse_amount(required("amount", self.amount)?)?;
        let date = parse_date(&required("date", self.date)?)?;
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => Category::default(),
            Some(category) => category.parse()?,
        };

        Ok(Expense::build(title, amount, date)
            .category(category)
            .description(self.description))
    }

    /// Validate the request as a partial update.
    ///
    /// Absent fields are left out of the patch. An empty `description`
    /// clears the description.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] naming the first present field that is
    /// invalid.
    pub fn into_patch(self) -> Result<ExpensePatch, Error> {
        Ok(ExpensePatch {
            title: self.title.as_deref().map(Title::new).transpose()?,
            amount: self.amount.map(parse_amount).transpose()?,
            category: self.category.as_deref().map(str::parse).transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
            description: self.description,
        })
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| Error::validation(field, format!("{field} is required")))
}

/// Parse a JSON number or string as an amount greater than zero.
fn parse_amount(value: serde_json::Value) -> Result<Amount, Error> {
    let amount: Amount = serde_json::from_value(value)
        .map_err(|error| Error::validation("amount", error.to_string()))?;

    if amount.is_zero() {
        return Err(Error::validation("amount", "amount must be greater than 0"));
    }

    Ok(amount)
}

fn parse_date(text: &str) -> Result<Date, Error> {
    date_format::parse(text.trim()).map_err(|_| {
        Error::validation(
            "date",
            format!("\"{text}\" is not a valid date, expected the format YYYY-MM-DD"),
        )
    })
}
