//! The transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{
        Transaction, TransactionDraft, TransactionId, TransactionPatch, TransactionWithOwner,
    },
    user::{OwnerSummary, UserId},
};

/// Handles the creation and retrieval of transaction records.
pub trait TransactionStore {
    /// Create a new transaction owned by `owner_id`.
    ///
    /// Returns [Error::DuplicateCode] if the draft carries a code that
    /// another transaction already uses.
    fn create(&mut self, owner_id: UserId, draft: TransactionDraft) -> Result<Transaction, Error>;

    /// Get a transaction by its ID.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Find the transaction with the given code, if one exists.
    fn find_by_code(&self, code: &str) -> Result<Option<Transaction>, Error>;

    /// Get every transaction with its owner, most recently created first.
    fn list_all(&self) -> Result<Vec<TransactionWithOwner>, Error>;

    /// Get the transactions owned by `owner_id`, most recently created
    /// first.
    fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<TransactionWithOwner>, Error>;

    /// Apply a partial update to the transaction with `id`, stamping
    /// `updated_at`.
    fn update(&mut self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error>;

    /// Delete the transaction with `id`.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error>;
}

/// Create the transaction table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                code TEXT UNIQUE,
                owner_id INTEGER NOT NULL,
                platform TEXT NOT NULL,
                amount REAL NOT NULL,
                transaction_date TEXT NOT NULL,
                status TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

fn encode_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn decode_date(row: &Row, index: usize) -> Result<Date, rusqlite::Error> {
    let raw_date: String = row.get(index)?;

    Date::parse(&raw_date, &DATE_FORMAT).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

/// A [TransactionStore] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

const TRANSACTION_COLUMNS: &str = "t.id, t.code, t.owner_id, t.platform, t.amount, \
    t.transaction_date, t.status, t.notes, t.created_at, t.updated_at";

const OWNER_COLUMNS: &str = "u.id, u.username, u.display_name, u.is_admin";

impl SqliteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
        Ok(Transaction {
            id: TransactionId::new(row.get(0)?),
            code: row.get(1)?,
            owner_id: UserId::new(row.get(2)?),
            platform: row.get(3)?,
            amount: row.get(4)?,
            transaction_date: decode_date(row, 5)?,
            status: row.get(6)?,
            notes: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    // The owner columns sit after the transaction columns in joined queries.
    fn map_joined_row(row: &Row) -> Result<TransactionWithOwner, rusqlite::Error> {
        Ok(TransactionWithOwner {
            transaction: Self::map_row(row)?,
            owner: OwnerSummary {
                id: UserId::new(row.get(10)?),
                username: row.get(11)?,
                display_name: row.get(12)?,
                is_admin: row.get(13)?,
            },
        })
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create and insert a new transaction into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn create(&mut self, owner_id: UserId, draft: TransactionDraft) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        connection
            .execute(
                "INSERT INTO \"transaction\"
                    (code, owner_id, platform, amount, transaction_date, status, notes,
                        created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                (
                    &draft.code,
                    owner_id.as_i64(),
                    &draft.platform,
                    draft.amount,
                    encode_date(draft.transaction_date),
                    draft.status,
                    &draft.notes,
                    now,
                    now,
                ),
            )
            .map_err(|error| match Error::from(error) {
                Error::DuplicateCode(_) => {
                    Error::DuplicateCode(draft.code.clone().unwrap_or_default())
                }
                error => error,
            })?;

        let id = TransactionId::new(connection.last_insert_rowid());

        Ok(Transaction {
            id,
            code: draft.code,
            owner_id,
            platform: draft.platform,
            amount: draft.amount,
            transaction_date: draft.transaction_date,
            status: draft.status,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" t WHERE t.id = :id"
            ))?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Transaction>, Error> {
        use rusqlite::OptionalExtension;

        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" t WHERE t.code = :code"
            ))?
            .query_row(&[(":code", code)], Self::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn list_all(&self) -> Result<Vec<TransactionWithOwner>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS}, {OWNER_COLUMNS}
                    FROM \"transaction\" t
                    INNER JOIN user u ON t.owner_id = u.id
                    ORDER BY t.created_at DESC, t.id DESC"
            ))?
            .query_map([], Self::map_joined_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<TransactionWithOwner>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS}, {OWNER_COLUMNS}
                    FROM \"transaction\" t
                    INNER JOIN user u ON t.owner_id = u.id
                    WHERE t.owner_id = :owner_id
                    ORDER BY t.created_at DESC, t.id DESC"
            ))?
            .query_map(&[(":owner_id", &owner_id.as_i64())], Self::map_joined_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn update(&mut self, id: TransactionId, patch: TransactionPatch) -> Result<(), Error> {
        let mut assignments = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(code) = &patch.code {
            assignments.push("code = ?");
            params.push(Box::new(code.clone()));
        }

        if let Some(platform) = &patch.platform {
            assignments.push("platform = ?");
            params.push(Box::new(platform.clone()));
        }

        if let Some(amount) = patch.amount {
            assignments.push("amount = ?");
            params.push(Box::new(amount));
        }

        if let Some(transaction_date) = patch.transaction_date {
            assignments.push("transaction_date = ?");
            params.push(Box::new(encode_date(transaction_date)));
        }

        if let Some(status) = patch.status {
            assignments.push("status = ?");
            params.push(Box::new(status));
        }

        if let Some(notes) = &patch.notes {
            assignments.push("notes = ?");
            params.push(Box::new(notes.clone()));
        }

        assignments.push("updated_at = ?");
        params.push(Box::new(OffsetDateTime::now_utc()));
        params.push(Box::new(id.as_i64()));

        let sql = format!(
            "UPDATE \"transaction\" SET {} WHERE id = ?",
            assignments.join(", ")
        );

        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute(
                &sql,
                rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            )
            .map_err(|error| match Error::from(error) {
                Error::DuplicateCode(_) => Error::DuplicateCode(
                    patch.code.clone().flatten().unwrap_or_default(),
                ),
                error => error,
            })?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id.as_i64(),))?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
