//! Aggregates an owner's expenses for a month into totals.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Amount, Category, Error, MonthRange, OwnerId,
    expense::{ExpenseFilter, sum_by_category},
};

/// The total amount spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The category the expenses belong to.
    pub category: Category,
    /// The sum of the expense amounts in the category.
    pub total_amount: Amount,
}

/// The spending of one owner over one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The month the summary covers.
    pub month: MonthRange,
    /// The sum of all expense amounts in the month.
    pub total_amount: Amount,
    /// The per category totals, largest first. Categories without any
    /// expenses in the month are left out.
    pub by_category: Vec<CategoryTotal>,
}

/// Summarize the expenses owned by `owner` dated within `month`.
///
/// # Errors
/// This function will return a:
/// - [Error::SqlError] if there is an SQL error,
/// - or [Error::AmountOverflow] if the total does not fit in an [Amount].
pub fn summarize(
    owner: OwnerId,
    month: MonthRange,
    connection: &Connection,
) -> Result<Summary, Error> {
    let category_totals = sum_by_category(owner, &ExpenseFilter::month(month), connection)?;

    build_summary(month, category_totals)
}

/// Order `category_totals` by total and add them up.
///
/// `category_totals` should be in discovery order. Categories with equal
/// totals keep that order.
pub(crate) fn build_summary(
    month: MonthRange,
    mut category_totals: Vec<CategoryTotal>,
) -> Result<Summary, Error> {
    let total_amount = Amount::sum(category_totals.iter().map(|total| total.total_amount))?;

    // `sort_by` is stable, so ties keep discovery order.
    category_totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    Ok(Summary {
        month,
        total_amount,
        by_category: category_totals,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Amount, Category, Error, MonthRange, OwnerId,
        test_utils::{cents, insert_test_expense, must_create_test_connection},
    };

    use super::{CategoryTotal, build_summary, summarize};

    const OWNER: OwnerId = OwnerId::new(1);

    fn february() -> MonthRange {
        MonthRange::parse("2024-02").unwrap()
    }

    #[test]
    fn summarizes_only_the_requested_month() {
        let conn = must_create_test_connection();
        insert_test_expense(OWNER, "Groceries", 1000, Category::Food, date!(2024 - 02 - 01), &conn);
        insert_test_expense(OWNER, "Lunch", 500, Category::Food, date!(2024 - 02 - 29), &conn);
        insert_test_expense(OWNER, "Power", 2000, Category::Bills, date!(2024 - 03 - 01), &conn);

        let got = summarize(OWNER, february(), &conn).unwrap();

        assert_eq!(got.total_amount, cents(1500));
        assert_eq!(
            got.by_category,
            vec![CategoryTotal {
                category: Category::Food,
                total_amount: cents(1500),
            }]
        );
    }

    #[test]
    fn empty_month_has_zero_total_and_no_categories() {
        let conn = must_create_test_connection();
        insert_test_expense(OWNER, "Power", 2000, Category::Bills, date!(2024 - 03 - 01), &conn);

        let got = summarize(OWNER, february(), &conn).unwrap();

        assert_eq!(got.total_amount, Amount::ZERO);
        assert!(got.by_category.is_empty());
    }

    #[test]
    fn ignores_other_owners() {
        let conn = must_create_test_connection();
        insert_test_expense(OWNER, "Lunch", 500, Category::Food, date!(2024 - 02 - 10), &conn);
        insert_test_expense(
            OwnerId::new(2),
            "Lunch",
            900,
            Category::Food,
            date!(2024 - 02 - 10),
            &conn,
        );

        let got = summarize(OWNER, february(), &conn).unwrap();

        assert_eq!(got.total_amount, cents(500));
    }

    #[test]
    fn categories_are_sorted_by_total_descending() {
        let conn = must_create_test_connection();
        insert_test_expense(OWNER, "Bus", 300, Category::Transport, date!(2024 - 02 - 02), &conn);
        insert_test_expense(OWNER, "Rent", 50000, Category::Bills, date!(2024 - 02 - 03), &conn);
        insert_test_expense(OWNER, "Lunch", 1200, Category::Food, date!(2024 - 02 - 04), &conn);
        insert_test_expense(OWNER, "Train", 1000, Category::Transport, date!(2024 - 02 - 05), &conn);

        let got = summarize(OWNER, february(), &conn).unwrap();

        let categories: Vec<_> = got.by_category.iter().map(|total| total.category).collect();
        assert_eq!(
            categories,
            vec![Category::Bills, Category::Transport, Category::Food]
        );
    }

    #[test]
    fn category_totals_add_up_to_total() {
        let conn = must_create_test_connection();
        // Amounts that drift when added up as floating point numbers.
        for _ in 0..10 {
            insert_test_expense(OWNER, "Gum", 10, Category::Food, date!(2024 - 02 - 14), &conn);
            insert_test_expense(OWNER, "Stamp", 20, Category::Other, date!(2024 - 02 - 15), &conn);
        }

        let got = summarize(OWNER, february(), &conn).unwrap();

        let sum_of_categories: i64 = got
            .by_category
            .iter()
            .map(|total| total.total_amount.cents())
            .sum();
        assert_eq!(sum_of_categories, got.total_amount.cents());
        assert_eq!(got.total_amount, cents(300));
    }

    #[test]
    fn ties_keep_discovery_order() {
        let totals = vec![
            CategoryTotal {
                category: Category::Health,
                total_amount: cents(500),
            },
            CategoryTotal {
                category: Category::Shopping,
                total_amount: cents(900),
            },
            CategoryTotal {
                category: Category::Entertainment,
                total_amount: cents(500),
            },
        ];

        let got = build_summary(february(), totals).unwrap();

        let categories: Vec<_> = got.by_category.iter().map(|total| total.category).collect();
        assert_eq!(
            categories,
            vec![Category::Shopping, Category::Health, Category::Entertainment]
        );
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let totals = vec![
            CategoryTotal {
                category: Category::Bills,
                total_amount: cents(i64::MAX),
            },
            CategoryTotal {
                category: Category::Food,
                total_amount: cents(1),
            },
        ];

        assert_eq!(
            build_summary(february(), totals),
            Err(Error::AmountOverflow)
        );
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let summary = build_summary(
            february(),
            vec![CategoryTotal {
                category: Category::Food,
                total_amount: cents(1500),
            }],
        )
        .unwrap();

        let json = serde_json::to_value(summary).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "month": "2024-02",
                "totalAmount": 15.0,
                "byCategory": [{ "category": "Food", "totalAmount": 15.0 }],
            })
        );
    }
}
