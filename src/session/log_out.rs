//! The log-out handler.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, endpoints, session::store::clear_session};

/// Handler for log-out requests via the POST method.
///
/// Clears the process-wide session, removes the persisted session slot and
/// redirects the client to the log-in page.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread or is poisoned.
pub async fn post_log_out(State(state): State<AppState>) -> Response {
    state.session.with_mut(|session| session.log_out());

    if let Err(error) = clear_session(&state.db_connection.lock().unwrap()) {
        tracing::error!("Could not clear the persisted session: {error}");
    }

    Redirect::to(endpoints::LOG_IN_VIEW).into_response()
}
