//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{Amount, Error, OwnerId, expense::Category, month::date_format};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A validated, non-empty expense title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
pub struct Title(String);

impl Title {
    /// Create a title from `title` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `title` is empty
    /// or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::validation("title", "title must not be empty"))
        } else {
            Ok(Self(title.to_owned()))
        }
    }

    /// Create a title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Title {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Title::new(s)
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Title {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Title {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Title::new_unchecked)
    }
}

/// Trim `description` and treat an empty description as no description.
pub(crate) fn normalize_description(description: &str) -> Option<String> {
    let description = description.trim();

    if description.is_empty() {
        None
    } else {
        Some(description.to_owned())
    }
}

/// Money that a user spent on something.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user the expense belongs to.
    pub owner: OwnerId,
    /// A short name for what the money was spent on.
    pub title: Title,
    /// How much was spent.
    pub amount: Amount,
    /// What kind of expense it was.
    pub category: Category,
    /// When the money was spent.
    #[serde(serialize_with = "date_format::serialize")]
    pub date: Date,
    /// Optional free text notes.
    pub description: Option<String>,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the expense was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(title: Title, amount: Amount, date: Date) -> NewExpense {
        NewExpense {
            title,
            amount,
            category: Category::default(),
            date,
            description: None,
        }
    }
}

/// The fields needed to insert an expense.
///
/// The store assigns the ID and timestamps.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{Amount, Category, Expense, Title};
///
/// let new_expense = Expense::build(
///         Title::new("Lunch")?,
///         "12.50".parse::<Amount>()?,
///         date!(2024 - 02 - 29),
///     )
///     .category(Category::Food)
///     .description(Some("office".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A short name for what the money was spent on.
    pub title: Title,
    /// How much was spent.
    pub amount: Amount,
    /// What kind of expense it was. Defaults to [Category::Other].
    pub category: Category,
    /// When the money was spent.
    pub date: Date,
    /// Optional free text notes.
    pub description: Option<String>,
}

impl NewExpense {
    /// Set the category for the expense.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description for the expense.
    ///
    /// Blank descriptions are stored as no description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.as_deref().and_then(normalize_description);
        self
    }
}

/// A partial update to an expense.
///
/// Fields set to `Some` overwrite the stored value, fields left as `None`
/// are not changed. Setting `description` to `Some(String::new())` clears
/// the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    /// The new title.
    pub title: Option<Title>,
    /// The new amount.
    pub amount: Option<Amount>,
    /// The new category.
    pub category: Option<Category>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
}

impl ExpensePatch {
    /// Overwrite the fields of `expense` that are present in the patch.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(title) = &self.title {
            expense.title = title.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(description) = &self.description {
            expense.description = normalize_description(description);
        }
    }
}
