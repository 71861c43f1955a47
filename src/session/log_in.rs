//! The log-in page and the log-in form handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, labelled_text_input,
    },
    session::store::save_session,
    user::UserStore,
};

pub const USER_NOT_FOUND_ERROR_MSG: &str = "No user with that username exists.";
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect secret.";

/// The raw data entered by the user in the log-in form.
///
/// The username and secret are stored as plain strings. There is no need for
/// validation here since they will be compared against the values in the
/// database.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Secret entered during log-in.
    pub secret: String,
}

fn log_in_page(
    username_value: &str,
    username_error: Option<&str>,
    secret_error: Option<&str>,
) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold my-4" { "Log in" }

            form
                action=(endpoints::LOG_IN_API)
                method="post"
                class="flex flex-col gap-4 w-full"
            {
                (labelled_text_input("text", "username", "Username", username_value, username_error))
                (labelled_text_input("password", "secret", "Secret", "", secret_error))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
            }
        }
    };

    base("Log In", &content)
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Markup {
    log_in_page("", None, None)
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in the process-wide session is replaced, persisted,
/// and the client is redirected to the dashboard page. Otherwise the form is
/// rendered again with an error message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread or is poisoned.
pub async fn post_log_in(
    State(state): State<AppState>,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let user = match state.user_store().get_by_username(&log_in_data.username) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_page(
                &log_in_data.username,
                Some(USER_NOT_FOUND_ERROR_MSG),
                None,
            )
            .into_response();
        }
        Err(error) => return error.into_response(),
    };

    // The secret is stored as plaintext, so logging in is a byte comparison.
    if user.secret.as_bytes() != log_in_data.secret.as_bytes() {
        return log_in_page(
            &log_in_data.username,
            None,
            Some(INVALID_CREDENTIALS_ERROR_MSG),
        )
        .into_response();
    }

    tracing::info!("User \"{}\" logged in.", user.username);
    state.session.with_mut(|session| session.log_in(user.clone()));

    // Persistence is best effort, a failure here must not block the log-in.
    if let Err(error) = save_session(&state.db_connection.lock().unwrap(), &user) {
        tracing::error!("Could not persist the session: {error}");
    }

    Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
}
