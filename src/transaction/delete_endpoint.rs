//! The handler for deleting a transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, Error, endpoints, transaction::{TransactionId, TransactionManager}};

/// Handler for deleting a transaction via the POST method. Admin only.
///
/// # Errors
///
/// Returns [Error::Forbidden] unless the session currently has admin rights
/// and [Error::NotFound] if the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
) -> Result<Response, Error> {
    let mut manager =
        TransactionManager::new(state.transaction_store(), state.session.current());
    manager.delete(TransactionId::new(transaction_id))?;

    Ok(Redirect::to(endpoints::DASHBOARD_VIEW).into_response())
}
