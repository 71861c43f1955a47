//! The handler for deleting a user.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    user::{UserId, UserManager, users_page::users_page_markup},
};

/// Handler for deleting a user via the POST method. Admin only.
///
/// Deleting a user also deletes their transactions through the foreign key
/// cascade. An admin trying to delete their own account gets the users page
/// back with an explanation instead.
pub async fn delete_user_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Response {
    let session = state.session.current();
    let mut manager = UserManager::new(state.user_store(), session.clone());

    match manager.delete(UserId::new(user_id)) {
        Ok(()) => Redirect::to(endpoints::USERS_VIEW).into_response(),
        Err(error @ Error::SelfDeleteForbidden) => {
            let users = match manager.list() {
                Ok(users) => users,
                Err(error) => return error.into_response(),
            };

            users_page_markup(
                &session,
                &users,
                Some(Alert::error("Could not delete the user.", &format!("{error}."))),
            )
            .into_response()
        }
        Err(error) => error.into_response(),
    }
}
