//! Persistence for the process-wide session.
//!
//! The authenticated user is stored as a JSON blob in a single well-known
//! slot of the `key_value` table so that the session survives a server
//! restart. Impersonation is deliberately not persisted: after a restart an
//! admin is back in their own view.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, session::Session, user::User};

const SESSION_KEY: &str = "user_session";

/// Create the key-value table that holds the session slot.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub(crate) fn create_key_value_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Load the persisted session, if any.
///
/// A missing slot yields an anonymous session. A slot that cannot be parsed
/// is discarded and also yields an anonymous session, so a corrupt blob can
/// never lock the application out.
pub(crate) fn load_session(connection: &Connection) -> Result<Session, Error> {
    let raw_session: Option<String> = connection
        .query_row(
            "SELECT value FROM key_value WHERE key = ?1",
            (SESSION_KEY,),
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw_session) = raw_session else {
        return Ok(Session::anonymous());
    };

    match serde_json::from_str::<User>(&raw_session) {
        Ok(user) => Ok(Session::logged_in(user)),
        Err(error) => {
            tracing::warn!("Discarding unreadable session slot: {error}");
            clear_session(connection)?;

            Ok(Session::anonymous())
        }
    }
}

/// Persist `user` as the logged-in user.
///
/// Persistence is best effort: a session that cannot be serialized is logged
/// and skipped, the in-memory session stays authoritative until the next
/// restart.
pub(crate) fn save_session(connection: &Connection, user: &User) -> Result<(), Error> {
    let raw_session = match serde_json::to_string(user) {
        Ok(raw_session) => raw_session,
        Err(error) => {
            tracing::error!("Could not serialize the session: {error}");
            return Ok(());
        }
    };

    connection.execute(
        "INSERT INTO key_value (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (SESSION_KEY, raw_session),
    )?;

    Ok(())
}

/// Remove the persisted session, if any.
pub(crate) fn clear_session(connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM key_value WHERE key = ?1", (SESSION_KEY,))?;

    Ok(())
}
