//! The local filter and sort pipeline for transaction tables.
//!
//! Filtering and sorting happen in memory over the records the manager
//! already fetched, the database is only asked for the visibility scope.

use serde::Deserialize;

use crate::transaction::{Platform, Status, TransactionWithOwner};

/// The column a transaction table is sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Sort by the transaction code.
    Code,
    /// Sort by the platform code.
    Platform,
    /// Sort by the amount.
    Amount,
    /// Sort by the transaction date.
    TransactionDate,
    /// Sort by the settlement status.
    Status,
    /// Sort by when the record was created.
    #[default]
    CreatedAt,
}

impl SortKey {
    /// The stable identifier used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Code => "code",
            SortKey::Platform => "platform",
            SortKey::Amount => "amount",
            SortKey::TransactionDate => "date",
            SortKey::Status => "status",
            SortKey::CreatedAt => "created",
        }
    }

    /// Parse a sort key from its identifier, falling back to the default
    /// for anything unknown.
    pub fn parse(raw_key: &str) -> Self {
        match raw_key {
            "code" => SortKey::Code,
            "platform" => SortKey::Platform,
            "amount" => SortKey::Amount,
            "date" => SortKey::TransactionDate,
            "status" => SortKey::Status,
            _ => SortKey::CreatedAt,
        }
    }
}

/// The direction a transaction table is sorted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first. The default, so the newest records come first.
    #[default]
    Descending,
}

impl SortOrder {
    /// The stable identifier used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Parse a sort order from its identifier, falling back to the default
    /// for anything unknown.
    pub fn parse(raw_order: &str) -> Self {
        match raw_order {
            "asc" => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }

    /// The opposite direction, used when a column header is clicked again.
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// How a transaction table should be narrowed down and ordered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring match against the platform code. Empty
    /// matches everything.
    pub search_text: String,
    /// Keep only transactions with this status.
    pub status: Option<Status>,
    /// Keep only transactions from this platform.
    pub platform: Option<Platform>,
    /// The column to sort by.
    pub sort: SortKey,
    /// The direction to sort in.
    pub order: SortOrder,
}

impl TransactionFilter {
    /// Narrow down and order `transactions` in place.
    ///
    /// The sort is stable, so records that compare equal keep their
    /// newest-first order from the store.
    pub fn apply(&self, transactions: &mut Vec<TransactionWithOwner>) {
        let search_text = self.search_text.trim().to_lowercase();

        transactions.retain(|entry| {
            let transaction = &entry.transaction;

            if !search_text.is_empty()
                && !transaction
                    .platform
                    .as_str()
                    .to_lowercase()
                    .contains(&search_text)
            {
                return false;
            }

            if let Some(status) = self.status
                && transaction.status != status
            {
                return false;
            }

            if let Some(platform) = &self.platform
                && transaction.platform != *platform
            {
                return false;
            }

            true
        });

        transactions.sort_by(|left, right| {
            let left = &left.transaction;
            let right = &right.transaction;

            let ordering = match self.sort {
                SortKey::Code => left.code.cmp(&right.code),
                SortKey::Platform => left.platform.as_str().cmp(right.platform.as_str()),
                SortKey::Amount => left.amount.total_cmp(&right.amount),
                SortKey::TransactionDate => left.transaction_date.cmp(&right.transaction_date),
                SortKey::Status => status_rank(left.status).cmp(&status_rank(right.status)),
                SortKey::CreatedAt => left.created_at.cmp(&right.created_at),
            };

            match self.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }
}

fn status_rank(status: Status) -> usize {
    Status::ALL
        .iter()
        .position(|candidate| *candidate == status)
        .unwrap_or(Status::ALL.len())
}

/// The raw filter values from the query string of a table page.
///
/// Every field is optional and anything unparseable falls back to the
/// default, a stale or hand-edited URL must never break the page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilterParams {
    /// The search box content.
    #[serde(default)]
    pub search: String,
    /// The selected status identifier, empty for all.
    #[serde(default)]
    pub status: String,
    /// The selected platform code, empty for all.
    #[serde(default)]
    pub platform: String,
    /// The sort key identifier.
    #[serde(default)]
    pub sort: String,
    /// The sort order identifier.
    #[serde(default)]
    pub order: String,
}

impl FilterParams {
    /// Convert the raw query values into a typed filter.
    pub fn to_filter(&self) -> TransactionFilter {
        TransactionFilter {
            search_text: self.search.clone(),
            status: Status::parse(&self.status),
            platform: Platform::new(&self.platform).ok(),
            sort: SortKey::parse(&self.sort),
            order: SortOrder::parse(&self.order),
        }
    }
}
