//! The user model, the user record store and the admin-only user collection
//! manager.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod manager;
mod store;
mod users_page;

pub use manager::UserManager;
pub use store::{SqliteUserStore, UserStore};

pub(crate) use store::create_user_table;

pub(crate) use create_endpoint::{create_user_endpoint, get_new_user_page};
pub(crate) use delete_endpoint::delete_user_endpoint;
pub(crate) use edit_endpoint::{get_edit_user_page, update_user_endpoint};
pub(crate) use users_page::get_users_page;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The secret is stored and compared as plaintext. This mirrors the system
/// being tracked and is a known security gap, not a recommendation: anyone
/// with read access to the database can read every user's secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The unique name the user logs in with.
    pub username: String,
    /// The plaintext secret the user logs in with (known gap, see above).
    pub secret: String,
    /// The name shown in the UI for this user.
    pub display_name: String,
    /// Whether this user can manage other users and see all transactions.
    pub is_admin: bool,
    /// When the user record was created.
    pub created_at: OffsetDateTime,
    /// When the user record was last changed.
    pub updated_at: OffsetDateTime,
}

/// The data needed to create a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The unique name the user will log in with.
    pub username: String,
    /// The plaintext secret the user will log in with.
    pub secret: String,
    /// The name shown in the UI for this user.
    pub display_name: String,
    /// Whether this user can manage other users and see all transactions.
    pub is_admin: bool,
}

/// A partial update to a user record.
///
/// Only the fields set to `Some` are written, every other field keeps its
/// stored value. `updated_at` is always stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    /// Replace the username.
    pub username: Option<String>,
    /// Replace the secret.
    pub secret: Option<String>,
    /// Replace the display name.
    pub display_name: Option<String>,
    /// Grant or revoke admin rights.
    pub is_admin: Option<bool>,
}

/// A short summary of a user, used when a transaction row is displayed with
/// its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    /// The owner's user ID.
    pub id: UserId,
    /// The owner's username.
    pub username: String,
    /// The owner's display name.
    pub display_name: String,
    /// Whether the owner is an admin.
    pub is_admin: bool,
}
