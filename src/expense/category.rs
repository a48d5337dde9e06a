//! The fixed set of expense categories.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The category filter value that means "do not filter by category".
pub const ALL_CATEGORIES: &str = "All";

/// What an expense was for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, restaurants and takeaways.
    Food,
    /// Public transport, fuel and parking.
    Transport,
    /// Clothes, electronics and other purchases.
    Shopping,
    /// Rent, utilities and subscriptions.
    Bills,
    /// Medical and pharmacy costs.
    Health,
    /// Events, games and streaming.
    Entertainment,
    /// Anything that does not fit the other categories.
    #[default]
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Entertainment,
        Category::Other,
    ];

    /// The category's name as stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                Error::validation("category", format!("\"{s}\" is not a valid category"))
            })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the category filter of a list query.
///
/// Both [ALL_CATEGORIES] and a blank value mean no filter.
///
/// # Errors
///
/// Returns an [Error::Validation] if `filter` names an unknown category.
pub fn parse_category_filter(filter: Option<&str>) -> Result<Option<Category>, Error> {
    match filter.map(str::trim) {
        None | Some("") | Some(ALL_CATEGORIES) => Ok(None),
        Some(name) => name.parse().map(Some),
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;

        name.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Category, Error,
        expense::category::{ALL_CATEGORIES, parse_category_filter},
    };

    #[test]
    fn defaults_to_other() {
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn parses_every_category_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse(), Ok(category));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let result = "Groceries".parse::<Category>();

        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn all_sentinel_means_no_filter() {
        assert_eq!(parse_category_filter(Some(ALL_CATEGORIES)), Ok(None));
        assert_eq!(parse_category_filter(Some("")), Ok(None));
        assert_eq!(parse_category_filter(None), Ok(None));
    }

    #[test]
    fn named_category_is_a_filter() {
        assert_eq!(parse_category_filter(Some("Bills")), Ok(Some(Category::Bills)));
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&Category::Entertainment).unwrap(),
            "\"Entertainment\""
        );
    }
}
