//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    session::{SessionHandle, store::load_session},
    transaction::SqliteTransactionStore,
    user::SqliteUserStore,
};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The process-wide session.
    pub(crate) session: SessionHandle,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models, and rehydrate the session from the persisted
    /// session slot so a restart does not log the user out.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;
        let session = load_session(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            session: SessionHandle::new(session),
        })
    }

    /// A user store over this state's database connection.
    pub(crate) fn user_store(&self) -> SqliteUserStore {
        SqliteUserStore::new(self.db_connection.clone())
    }

    /// A transaction store over this state's database connection.
    pub(crate) fn transaction_store(&self) -> SqliteTransactionStore {
        SqliteTransactionStore::new(self.db_connection.clone())
    }
}
