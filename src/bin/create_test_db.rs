use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use money_manager::{
    AccountDetails, AccountType, Division, Transaction, TransactionType, create_account,
    create_transaction, initialize_db,
};

/// A utility for creating a test database for the REST API server of money_manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The `sub` claim of the user that will own the sample records.
    #[arg(long, short, default_value = "test-user")]
    user_id: String,
}

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

    let now = OffsetDateTime::now_utc();

    println!("Creating accounts for {}...", args.user_id);

    let accounts = [
        ("Everyday", AccountType::Checking, 1_250.0),
        ("Rainy day", AccountType::Savings, 8_000.0),
        ("Wallet", AccountType::Cash, 60.0),
    ];

    for (name, kind, balance) in accounts {
        create_account(
            AccountDetails {
                name: name.to_owned(),
                kind,
                balance: Some(balance),
                currency: None,
                description: None,
            },
            &args.user_id,
            now,
            &conn,
        )?;
    }

    println!("Creating transactions for {}...", args.user_id);

    let transactions = [
        (TransactionType::Income, 5_000.0, "Salary", "salary", Division::Personal, 20),
        (TransactionType::Expense, 1_200.0, "Rent", "housing", Division::Personal, 18),
        (TransactionType::Expense, 85.5, "Groceries", "food", Division::Personal, 9),
        (TransactionType::Expense, 42.0, "Team lunch", "food", Division::Office, 4),
        (TransactionType::Income, 300.0, "Consulting", "freelance", Division::Office, 2),
        (TransactionType::Expense, 12.0, "Coffee", "food", Division::Personal, 0),
    ];

    for (kind, amount, description, category, division, days_ago) in transactions {
        let builder = Transaction::build(kind, amount, description, category)
            .division(division)
            .date(now - Duration::days(days_ago));

        create_transaction(builder, &args.user_id, now, &conn)?;
    }

    println!("Success!");

    Ok(())
}
