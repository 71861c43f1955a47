//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, session::store::create_key_value_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the application tables if they do not exist yet.
///
/// # Errors
///
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&sql_transaction)?;
    create_transaction_table(&sql_transaction)?;
    create_key_value_table(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}
