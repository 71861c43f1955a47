//! Middleware that keeps anonymous sessions out of the app pages.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, endpoints};

/// Redirect to the log-in page unless someone is logged in.
pub async fn session_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.session.current().authenticated_user().is_none() {
        return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
    }

    next.run(request).await
}
