//! The transaction model, its record store, the session-aware manager and
//! the local filter and sort pipeline.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use time::{Date, OffsetDateTime};

use crate::{Error, user::{OwnerSummary, UserId}};

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod manager;
mod query;
mod store;
mod table;

pub use manager::{Statistics, TransactionManager};
pub use query::{FilterParams, SortKey, SortOrder, TransactionFilter};
pub use store::{SqliteTransactionStore, TransactionStore};

pub(crate) use create_endpoint::{create_transaction_endpoint, get_new_transaction_page};
pub(crate) use delete_endpoint::delete_transaction_endpoint;
pub(crate) use edit_endpoint::{get_edit_transaction_page, update_transaction_endpoint};
pub(crate) use store::create_transaction_table;
pub(crate) use table::transaction_table;

/// A newtype wrapper for integer transaction IDs.
///
/// This helps disambiguate transaction IDs from other types of IDs, leading
/// to better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The settlement status of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The withdrawal has been requested but not settled yet.
    Awaiting,
    /// The withdrawal settled and the money arrived.
    Withdrawn,
    /// The withdrawal was rejected or otherwise did not go through.
    Failed,
}

impl Status {
    /// Every status, in the order they are shown in filters and forms.
    pub const ALL: [Status; 3] = [Status::Awaiting, Status::Withdrawn, Status::Failed];

    /// The stable identifier used in the database and in form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Awaiting => "awaiting",
            Status::Withdrawn => "withdrawn",
            Status::Failed => "failed",
        }
    }

    /// The label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Awaiting => "Awaiting",
            Status::Withdrawn => "Withdrawn",
            Status::Failed => "Failed",
        }
    }

    /// Parse a status from its stable identifier.
    pub fn parse(raw_status: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw_status)
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>, rusqlite::Error> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|raw_status| Status::parse(raw_status).ok_or(FromSqlError::InvalidType))
    }
}

/// The external platform a withdrawal was made from.
///
/// Only a fixed set of platforms is tracked, so this type can only be
/// constructed from one of the known platform codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform(String);

impl Platform {
    /// The platform codes the application tracks.
    pub const ALL: [&'static str; 5] = ["96B", "K85", "56F", "65K", "78TT"];

    /// Create a platform from its code.
    ///
    /// Returns [Error::InvalidPlatform] if `code` is not a known platform.
    pub fn new(code: &str) -> Result<Self, Error> {
        if Self::ALL.contains(&code) {
            Ok(Self(code.to_owned()))
        } else {
            Err(Error::InvalidPlatform(code.to_owned()))
        }
    }

    /// The platform code as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for Platform {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>, rusqlite::Error> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Platform {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|code| Platform::new(code).map_err(|_| FromSqlError::InvalidType))
    }
}

/// A withdrawal tracked by the application.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    /// The transaction's ID in the application database.
    pub id: TransactionId,
    /// The code identifying the withdrawal on the external platform.
    ///
    /// Codes are unique when present, but a transaction may have no code,
    /// e.g. when the platform has not issued one yet.
    pub code: Option<String>,
    /// The user this transaction belongs to.
    pub owner_id: UserId,
    /// The platform the withdrawal was made from.
    pub platform: Platform,
    /// The amount withdrawn. Never negative.
    pub amount: f64,
    /// The calendar date of the withdrawal.
    pub transaction_date: Date,
    /// The settlement status.
    pub status: Status,
    /// Free-form notes.
    pub notes: String,
    /// When the record was created.
    pub created_at: OffsetDateTime,
    /// When the record was last changed.
    pub updated_at: OffsetDateTime,
}

/// A transaction joined with a summary of its owner, as shown in tables
/// where an admin sees everyone's records.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionWithOwner {
    /// The transaction itself.
    pub transaction: Transaction,
    /// A summary of the user the transaction belongs to.
    pub owner: OwnerSummary,
}

/// The validated data needed to create a new transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionDraft {
    /// The code, normalized: trimmed, an empty code becomes `None`.
    pub code: Option<String>,
    /// The platform the withdrawal was made from.
    pub platform: Platform,
    /// The amount withdrawn.
    pub amount: f64,
    /// The calendar date of the withdrawal.
    pub transaction_date: Date,
    /// The settlement status.
    pub status: Status,
    /// Free-form notes.
    pub notes: String,
}

impl TransactionDraft {
    /// Create a draft, normalizing the code and validating the amount.
    ///
    /// # Errors
    ///
    /// Returns [Error::NegativeAmount] if `amount` is below zero.
    pub fn new(
        code: &str,
        platform: Platform,
        amount: f64,
        transaction_date: Date,
        status: Status,
        notes: &str,
    ) -> Result<Self, Error> {
        if amount < 0.0 {
            return Err(Error::NegativeAmount(amount));
        }

        let code = code.trim();

        Ok(Self {
            code: (!code.is_empty()).then(|| code.to_owned()),
            platform,
            amount,
            transaction_date,
            status,
            notes: notes.trim().to_owned(),
        })
    }
}

/// A partial update to a transaction record.
///
/// Only the fields set to `Some` are written, every other field keeps its
/// stored value. The outer `Option` on `code` distinguishes "leave the code
/// alone" from "clear the code".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionPatch {
    /// Replace or clear the code.
    pub code: Option<Option<String>>,
    /// Replace the platform.
    pub platform: Option<Platform>,
    /// Replace the amount.
    pub amount: Option<f64>,
    /// Replace the transaction date.
    pub transaction_date: Option<Date>,
    /// Replace the status.
    pub status: Option<Status>,
    /// Replace the notes.
    pub notes: Option<String>,
}
