//! Filter predicates for expense queries.

use rusqlite::types::Value;

use crate::{Error, MonthRange, OwnerId, db::UNICODE_LOWER, expense::Category};

use super::category::parse_category_filter;

/// Which expenses a query should match, in addition to the owner.
///
/// All present conditions must hold. An empty filter matches all of the
/// owner's expenses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Only match expenses dated within this month.
    pub month: Option<MonthRange>,
    /// Only match expenses whose title or description contains this text,
    /// ignoring case. Must already be lowercase, as
    /// [ExpenseFilter::parse] makes it.
    pub search: Option<String>,
    /// Only match expenses in this category.
    pub category: Option<Category>,
}

impl ExpenseFilter {
    /// A filter matching every expense dated within `month`.
    pub fn month(month: MonthRange) -> Self {
        Self {
            month: Some(month),
            ..Default::default()
        }
    }

    /// Build a filter from raw query string values.
    ///
    /// Blank values are treated as absent, and the category "All" means no
    /// category filter.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `month` is not `YYYY-MM` or if
    /// `category` is not a known category.
    pub fn parse(
        month: Option<&str>,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, Error> {
        let month = match month.map(str::trim) {
            None | Some("") => None,
            Some(month) => Some(MonthRange::parse(month)?),
        };

        let search = search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            month,
            search,
            category: parse_category_filter(category)?,
        })
    }

    /// Build the SQL `WHERE` clause, without the keyword, and its positional
    /// parameters for this filter scoped to `owner`.
    pub(crate) fn to_sql(&self, owner: OwnerId) -> (String, Vec<Value>) {
        let mut conditions = vec!["owner_id = ?".to_owned()];
        let mut params = vec![Value::Integer(owner.as_i64())];

        if let Some(month) = &self.month {
            conditions.push("date BETWEEN ? AND ?".to_owned());
            params.push(Value::Text(month.start().to_string()));
            params.push(Value::Text(month.end().to_string()));
        }

        if let Some(search) = &self.search {
            // `instr` has no wildcards, so the search text is matched literally.
            conditions.push(format!(
                "(instr({UNICODE_LOWER}(title), ?) > 0 \
                OR instr({UNICODE_LOWER}(COALESCE(description, '')), ?) > 0)"
            ));
            params.push(Value::Text(search.clone()));
            params.push(Value::Text(search.clone()));
        }

        if let Some(category) = self.category {
            conditions.push("category = ?".to_owned());
            params.push(Value::Text(category.as_str().to_owned()));
        }

        (conditions.join(" AND "), params)
    }
}
