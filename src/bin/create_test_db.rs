use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{
    Amount, Category, Expense, OwnerId, Title, expense::insert_expense, initialize_db,
};

/// A utility for creating a test database for the REST API server of expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the owner to create expenses for.
    #[arg(long, default_value_t = 1)]
    owner_id: i64,
}

/// Title, cents and category for each sample expense, one per day going back from today.
const SAMPLE_EXPENSES: [(&str, i64, Category); 8] = [
    ("Groceries", 8_450, Category::Food),
    ("Bus fare", 320, Category::Transport),
    ("Power bill", 14_999, Category::Bills),
    ("Cinema", 2_200, Category::Entertainment),
    ("Pharmacy", 1_275, Category::Health),
    ("New shoes", 12_000, Category::Shopping),
    ("Lunch", 1_850, Category::Food),
    ("Birthday gift", 4_000, Category::Other),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test expenses...");

    let owner = OwnerId::new(args.owner_id);
    let today = OffsetDateTime::now_utc().date();

    // Spread the expenses out every 5 days so that they span more than one month.
    for (days_ago, (title, cents, category)) in (0_i64..).step_by(5).zip(SAMPLE_EXPENSES) {
        let date: Date = today - Duration::days(days_ago);
        let new_expense = Expense::build(Title::new(title)?, Amount::from_cents(cents)?, date)
            .category(category);

        insert_expense(owner, &new_expense, &conn)?;
    }

    println!("Success!");

    Ok(())
}
