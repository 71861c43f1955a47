//! The admin page and handler for editing an existing user.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    endpoints::format_endpoint,
    user::{
        User, UserId, UserManager, UserUpdate,
        create_endpoint::{UserFormData, user_form_page},
    },
};

const SECRET_LABEL: &str = "Secret (leave blank to keep the current one)";

fn form_values(user: &User) -> UserFormData {
    UserFormData {
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        secret: String::new(),
        is_admin: user.is_admin.then(|| "on".to_owned()),
    }
}

/// Display the admin page for editing the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::Forbidden] unless the session currently has admin rights
/// and [Error::NotFound] if no user with `user_id` exists.
pub async fn get_edit_user_page(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Markup, Error> {
    let manager = UserManager::new(state.user_store(), state.session.current());
    let user = manager.get(UserId::new(user_id))?;

    Ok(user_form_page(
        "Edit User",
        &format_endpoint(endpoints::UPDATE_USER, user_id),
        &form_values(&user),
        SECRET_LABEL,
        None,
    ))
}

/// Handler for updating a user via the POST method. Admin only.
///
/// An empty secret field keeps the stored secret, everything else is
/// replaced. On success the client is redirected to the users page, a
/// duplicate username renders the form again with an error message.
pub async fn update_user_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form_data): Form<UserFormData>,
) -> Response {
    let action = format_endpoint(endpoints::UPDATE_USER, user_id);
    let render_error = |message: String| {
        user_form_page(
            "Edit User",
            &action,
            &form_data,
            SECRET_LABEL,
            Some(Alert::error("Could not save the user.", &message)),
        )
        .into_response()
    };

    let username = form_data.username.trim().to_owned();

    if username.is_empty() {
        return render_error("Enter a username.".to_owned());
    }

    let update = UserUpdate {
        display_name: if form_data.display_name.trim().is_empty() {
            Some(username.clone())
        } else {
            Some(form_data.display_name.trim().to_owned())
        },
        username: Some(username),
        secret: (!form_data.secret.is_empty()).then(|| form_data.secret.clone()),
        is_admin: Some(form_data.is_admin.is_some()),
    };

    let mut manager = UserManager::new(state.user_store(), state.session.current());

    match manager.update(UserId::new(user_id), update) {
        Ok(()) => Redirect::to(endpoints::USERS_VIEW).into_response(),
        Err(error @ Error::DuplicateUsername(_)) => render_error(format!("{error}.")),
        Err(error) => error.into_response(),
    }
}
