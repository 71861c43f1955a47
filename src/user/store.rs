//! The user store trait and its SQLite implementation.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    user::{NewUser, User, UserId, UserUpdate},
};

/// Handles the creation and retrieval of user records.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Returns [Error::DuplicateUsername] if the username is already taken.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    fn get(&self, id: UserId) -> Result<User, Error>;

    /// Get a user by their username.
    ///
    /// Returns [Error::NotFound] if no user with the given username exists.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// Get all users, most recently created first.
    fn list(&self) -> Result<Vec<User>, Error>;

    /// Apply a partial update to the user with `id`, stamping `updated_at`.
    fn update(&mut self, id: UserId, update: UserUpdate) -> Result<(), Error>;

    /// Delete the user with `id`.
    fn delete(&mut self, id: UserId) -> Result<(), Error>;
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                secret TEXT NOT NULL,
                display_name TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// A [UserStore] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: UserId::new(row.get(0)?),
            username: row.get(1)?,
            secret: row.get(2)?,
            display_name: row.get(3)?,
            is_admin: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

const USER_COLUMNS: &str = "id, username, secret, display_name, is_admin, created_at, updated_at";

impl UserStore for SqliteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or
    /// is poisoned.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        connection
            .execute(
                "INSERT INTO user (username, secret, display_name, is_admin, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    &new_user.username,
                    &new_user.secret,
                    &new_user.display_name,
                    new_user.is_admin,
                    now,
                    now,
                ),
            )
            .map_err(|error| match Error::from(error) {
                Error::DuplicateUsername(_) => {
                    Error::DuplicateUsername(new_user.username.clone())
                }
                error => error,
            })?;

        let id = UserId::new(connection.last_insert_rowid());

        Ok(User {
            id,
            username: new_user.username,
            secret: new_user.secret,
            display_name: new_user.display_name,
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: UserId) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM user WHERE username = :username"
            ))?
            .query_row(&[(":username", username)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn list(&self) -> Result<Vec<User>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM user ORDER BY created_at DESC, id DESC"
            ))?
            .query_map([], Self::map_row)?
            .map(|maybe_user| maybe_user.map_err(Error::from))
            .collect()
    }

    fn update(&mut self, id: UserId, update: UserUpdate) -> Result<(), Error> {
        let mut assignments = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(username) = &update.username {
            assignments.push("username = ?");
            params.push(Box::new(username.clone()));
        }

        if let Some(secret) = &update.secret {
            assignments.push("secret = ?");
            params.push(Box::new(secret.clone()));
        }

        if let Some(display_name) = &update.display_name {
            assignments.push("display_name = ?");
            params.push(Box::new(display_name.clone()));
        }

        if let Some(is_admin) = update.is_admin {
            assignments.push("is_admin = ?");
            params.push(Box::new(is_admin));
        }

        assignments.push("updated_at = ?");
        params.push(Box::new(OffsetDateTime::now_utc()));
        params.push(Box::new(id.as_i64()));

        let sql = format!("UPDATE user SET {} WHERE id = ?", assignments.join(", "));

        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute(
                &sql,
                rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            )
            .map_err(|error| match Error::from(error) {
                Error::DuplicateUsername(_) => {
                    Error::DuplicateUsername(update.username.clone().unwrap_or_default())
                }
                error => error,
            })?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn delete(&mut self, id: UserId) -> Result<(), Error> {
        let rows_changed = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM user WHERE id = ?1", (id.as_i64(),))?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
