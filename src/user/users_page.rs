//! The admin page listing every user.

use axum::extract::State;
use maud::{Markup, html};

use crate::{
    AppState, Error, Session,
    alert::Alert,
    endpoints,
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_date,
    },
    navigation::nav_bar,
    user::{User, UserManager},
};

/// Render the users page for an admin session.
pub(crate) fn users_page_markup(
    session: &Session,
    users: &[User],
    alert: Option<Alert>,
) -> Markup {
    let authenticated_id = session.authenticated_user().map(|user| user.id);

    let content = html! {
        (nav_bar(session))

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center gap-4 w-full max-w-4xl mb-4"
            {
                h1 class="text-2xl font-bold" { "Users" }

                a
                    href=(endpoints::NEW_USER_VIEW)
                    class=(format!("{BUTTON_PRIMARY_STYLE} ml-auto"))
                {
                    "New user"
                }
            }

            @if let Some(alert) = alert
            {
                (alert.into_html())
            }

            div class="w-full max-w-4xl overflow-x-auto"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Name" }
                            th class=(TABLE_CELL_STYLE) { "Username" }
                            th class=(TABLE_CELL_STYLE) { "Role" }
                            th class=(TABLE_CELL_STYLE) { "Created" }
                            th class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for user in users
                        {
                            @let is_self = authenticated_id == Some(user.id);

                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (user.display_name) }
                                td class=(TABLE_CELL_STYLE) { (user.username) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if user.is_admin { "Admin" } @else { "User" }
                                }
                                td class=(TABLE_CELL_STYLE) { (format_date(user.created_at.date())) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    div class="flex gap-2"
                                    {
                                        a
                                            href=(format_endpoint(endpoints::EDIT_USER_VIEW, user.id.as_i64()))
                                            class=(LINK_STYLE)
                                        {
                                            "Edit"
                                        }

                                        @if !is_self
                                        {
                                            form
                                                action=(format_endpoint(endpoints::ACCESS_AS, user.id.as_i64()))
                                                method="post"
                                            {
                                                button type="submit" class=(LINK_STYLE) { "Access as" }
                                            }

                                            form
                                                action=(format_endpoint(endpoints::DELETE_USER, user.id.as_i64()))
                                                method="post"
                                            {
                                                button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Users", &content)
}

/// Display the admin page for managing users.
///
/// # Errors
///
/// Returns [Error::Forbidden] unless the session currently has admin
/// rights.
pub async fn get_users_page(State(state): State<AppState>) -> Result<Markup, Error> {
    let session = state.session.current();
    let manager = UserManager::new(state.user_store(), session.clone());
    let users = manager.list()?;

    Ok(users_page_markup(&session, &users, None))
}
