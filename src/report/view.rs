//! Renders a [Report] as a printable HTML page.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::Amount;

use super::Report;

const GENERATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Format `amount` as dollars with thousands separators, e.g. "$1,234.50".
pub(crate) fn format_currency(amount: Amount) -> String {
    static FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let mut formatted_string = match formatter {
        Some(formatter) if !amount.is_zero() => formatter.fmt_string(amount.as_f64()),
        // Zero is hardcoded as "0" by numfmt.
        _ => return format!("${amount}"),
    };

    // numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3".
    match formatted_string.find('.') {
        None => formatted_string.push_str(".00"),
        Some(point) if formatted_string.len() - point == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}

/// Render `report` as a standalone HTML document.
pub fn render_report_html(report: &Report) -> Markup {
    let generated_at = report
        .generated_at
        .format(GENERATED_AT_FORMAT)
        .unwrap_or_else(|_| report.generated_at.to_string());

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="utf-8";
                title { "Expense Report " (report.month) }
                style { "body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; } h1 { text-align: center; } .description { font-size: 0.85em; color: #555; margin-left: 1rem; }" }
            }

            body
            {
                h1 { "Expense Tracker - Monthly Report" }

                p { "Owner: " (report.owner) }
                p { "Month: " (report.month) }
                p { "Generated at: " (generated_at) }

                h2 { "Summary" }
                p { "Total Spent: " (format_currency(report.summary.total_amount)) }

                p { "By Category:" }
                ul
                {
                    @for category_total in &report.summary.by_category {
                        li { (category_total.category) ": " (format_currency(category_total.total_amount)) }
                    }
                }

                h2 { "Expenses" }
                @if report.ordered_expenses.is_empty() {
                    p { "No expenses recorded this month." }
                }
                ul
                {
                    @for expense in &report.ordered_expenses {
                        li
                        {
                            (expense.date) " - " (expense.title) " - " (expense.category) " - " (format_currency(expense.amount))

                            @if let Some(description) = &expense.description {
                                div class="description" { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Category, Expense, MonthRange, OwnerId, Title,
        report::Report,
        summary::{CategoryTotal, Summary},
        test_utils::cents,
    };

    use super::{format_currency, render_report_html};

    #[test]
    fn formats_currency_with_two_decimals() {
        assert_eq!(format_currency(cents(0)), "$0.00");
        assert_eq!(format_currency(cents(1234)), "$12.34");
        assert_eq!(format_currency(cents(1230)), "$12.30");
        assert_eq!(format_currency(cents(1500)), "$15.00");
        assert_eq!(format_currency(cents(123456)), "$1,234.56");
    }

    fn sample_report() -> Report {
        let month = MonthRange::parse("2024-02").unwrap();
        let expense = Expense {
            id: 1,
            owner: OwnerId::new(3),
            title: Title::new_unchecked("Lunch"),
            amount: cents(1234),
            category: Category::Food,
            date: date!(2024 - 02 - 29),
            description: Some("<b>office</b>".to_owned()),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        Report {
            owner: OwnerId::new(3),
            month,
            generated_at: OffsetDateTime::UNIX_EPOCH,
            summary: Summary {
                month,
                total_amount: cents(1234),
                by_category: vec![CategoryTotal {
                    category: Category::Food,
                    total_amount: cents(1234),
                }],
            },
            ordered_expenses: vec![expense],
        }
    }

    #[test]
    fn renders_summary_and_expenses() {
        let html = render_report_html(&sample_report()).into_string();

        assert!(html.contains("Month: 2024-02"));
        assert!(html.contains("Total Spent: $12.34"));
        assert!(html.contains("Food: $12.34"));
        assert!(html.contains("2024-02-29 - Lunch - Food - $12.34"));
        assert!(html.contains("Generated at: 1970-01-01 00:00:00"));
    }

    #[test]
    fn escapes_descriptions() {
        let html = render_report_html(&sample_report()).into_string();

        assert!(html.contains("&lt;b&gt;office&lt;/b&gt;"));
        assert!(!html.contains("<b>office</b>"));
    }
}
