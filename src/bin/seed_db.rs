use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use transtrack::{
    NewUser, Platform, SqliteTransactionStore, SqliteUserStore, Status, TransactionDraft,
    TransactionStore, UserStore, initialize_db,
};

/// A utility for creating a pre-populated database for the transtrack server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
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

    let conn = Arc::new(Mutex::new(conn));
    let mut user_store = SqliteUserStore::new(conn.clone());
    let mut transaction_store = SqliteTransactionStore::new(conn.clone());

    println!("Creating users...");

    let admin = user_store.create(NewUser {
        username: "admin".to_owned(),
        secret: "205874".to_owned(),
        display_name: "Administrator".to_owned(),
        is_admin: true,
    })?;

    let alice = user_store.create(NewUser {
        username: "alice".to_owned(),
        secret: "hunter2".to_owned(),
        display_name: "Alice".to_owned(),
        is_admin: false,
    })?;

    let bob = user_store.create(NewUser {
        username: "bob".to_owned(),
        secret: "swordfish".to_owned(),
        display_name: "Bob".to_owned(),
        is_admin: false,
    })?;

    println!("Creating transactions...");

    let samples = [
        (
            alice.id,
            "TRX001",
            "96B",
            1500.0,
            date!(2024 - 01 - 15),
            Status::Withdrawn,
        ),
        (
            alice.id,
            "TRX002",
            "K85",
            850.75,
            date!(2024 - 01 - 22),
            Status::Awaiting,
        ),
        (
            alice.id,
            "TRX003",
            "56F",
            2300.0,
            date!(2024 - 02 - 03),
            Status::Withdrawn,
        ),
        (
            bob.id,
            "TRX004",
            "65K",
            120.5,
            date!(2024 - 02 - 10),
            Status::Failed,
        ),
        (
            bob.id,
            "TRX005",
            "78TT",
            990.0,
            date!(2024 - 02 - 18),
            Status::Awaiting,
        ),
        (
            bob.id,
            "TRX006",
            "96B",
            45.25,
            date!(2024 - 03 - 01),
            Status::Withdrawn,
        ),
        (
            admin.id,
            "TRX007",
            "K85",
            3200.0,
            date!(2024 - 03 - 07),
            Status::Awaiting,
        ),
        (
            admin.id,
            "TRX008",
            "56F",
            760.0,
            date!(2024 - 03 - 12),
            Status::Failed,
        ),
    ];

    for (owner_id, code, platform, amount, transaction_date, status) in samples {
        let draft = TransactionDraft::new(
            code,
            Platform::new(platform)?,
            amount,
            transaction_date,
            status,
            "",
        )?;

        transaction_store.create(owner_id, draft)?;
    }

    println!("Success!");

    Ok(())
}
