//! The admin page and handler for creating a new user.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, LINK_STYLE, base,
        labelled_text_input,
    },
    user::{NewUser, UserManager},
};

/// The raw values of the user form, used for both creating and editing a
/// user.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct UserFormData {
    /// The username, unique across users.
    #[serde(default)]
    pub username: String,
    /// The name shown in the UI.
    #[serde(default)]
    pub display_name: String,
    /// The plaintext secret. Left empty on the edit form to keep the
    /// current one.
    #[serde(default)]
    pub secret: String,
    /// The admin checkbox. A checkbox is either submitted with a string
    /// value or not at all, so `Some` means checked.
    #[serde(default)]
    pub is_admin: Option<String>,
}

/// Render the user form with the given values filled in.
pub(crate) fn user_form_page(
    title: &str,
    action: &str,
    values: &UserFormData,
    secret_label: &str,
    alert: Option<Alert>,
) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold my-4" { (title) }

            @if let Some(alert) = alert
            {
                (alert.into_html())
            }

            form action=(action) method="post" class="flex flex-col gap-4 w-full"
            {
                (labelled_text_input("text", "username", "Username", &values.username, None))
                (labelled_text_input("text", "display_name", "Display name", &values.display_name, None))
                (labelled_text_input("password", "secret", secret_label, "", None))

                div class="flex items-center gap-2"
                {
                    input
                        type="checkbox"
                        name="is_admin"
                        id="is_admin"
                        checked[values.is_admin.is_some()];
                    label for="is_admin" class=(FORM_LABEL_STYLE) { "Admin" }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                a href=(endpoints::USERS_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base(title, &content)
}

/// Display the admin page for creating a new user.
pub async fn get_new_user_page(State(state): State<AppState>) -> Result<Markup, Error> {
    // Render nothing for sessions that could not submit the form anyway.
    if !state.session.current().is_admin_effective() {
        return Err(Error::Forbidden);
    }

    Ok(user_form_page(
        "New User",
        endpoints::USERS_API,
        &UserFormData::default(),
        "Secret",
        None,
    ))
}

/// Handler for creating a new user via the POST method. Admin only.
///
/// On success the client is redirected to the users page. A missing field
/// or a duplicate username renders the form again with an error message.
pub async fn create_user_endpoint(
    State(state): State<AppState>,
    Form(form_data): Form<UserFormData>,
) -> Response {
    let render_error = |message: String| {
        user_form_page(
            "New User",
            endpoints::USERS_API,
            &form_data,
            "Secret",
            Some(Alert::error("Could not create the user.", &message)),
        )
        .into_response()
    };

    let username = form_data.username.trim().to_owned();

    if username.is_empty() {
        return render_error("Enter a username.".to_owned());
    }

    if form_data.secret.is_empty() {
        return render_error("Enter a secret.".to_owned());
    }

    let new_user = NewUser {
        display_name: if form_data.display_name.trim().is_empty() {
            username.clone()
        } else {
            form_data.display_name.trim().to_owned()
        },
        username,
        secret: form_data.secret.clone(),
        is_admin: form_data.is_admin.is_some(),
    };

    let mut manager = UserManager::new(state.user_store(), state.session.current());

    match manager.create(new_user) {
        Ok(_) => Redirect::to(endpoints::USERS_VIEW).into_response(),
        Err(error @ Error::DuplicateUsername(_)) => render_error(format!("{error}.")),
        Err(error) => error.into_response(),
    }
}
