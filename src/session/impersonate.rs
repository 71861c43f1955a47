//! Handlers for an admin viewing the app as another user and returning to
//! their own view.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, Error, endpoints, user::{UserId, UserStore}};

/// Handler for an admin to start viewing the app as the user with `user_id`.
///
/// While active, every page is scoped to the target user's records and admin
/// affordances disappear, including for admin targets. Impersonation lives
/// only in memory, a server restart returns the admin to their own view.
///
/// # Errors
///
/// Returns [Error::Forbidden] unless the session currently has admin rights,
/// and [Error::NotFound] if no user with `user_id` exists.
pub async fn access_as_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, Error> {
    if !state.session.current().is_admin_effective() {
        return Err(Error::Forbidden);
    }

    let target = state.user_store().get(UserId::new(user_id))?;

    tracing::info!("Admin now viewing the app as \"{}\".", target.username);
    state.session.with_mut(|session| session.access_as(target));

    Ok(Redirect::to(endpoints::DASHBOARD_VIEW).into_response())
}

/// Handler for an admin to stop viewing the app as another user.
///
/// Always redirects to the dashboard, even when no impersonation is active.
pub async fn return_to_admin_endpoint(State(state): State<AppState>) -> Response {
    state.session.with_mut(|session| session.return_to_admin());

    Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
}
