//! The navigation bar shown at the top of every app page.

use maud::{Markup, html};

use crate::{Session, endpoints, html::{BUTTON_DELETE_STYLE, LINK_STYLE}};

const NAV_STYLE: &str = "flex flex-wrap items-center gap-4 px-6 py-3 bg-white \
    dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700 \
    text-gray-900 dark:text-white";

const BANNER_STYLE: &str = "flex items-center gap-4 px-6 py-2 text-sm \
    text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300";

/// Render the navigation bar for the given session.
///
/// Admin-only tabs follow the session's effective admin flag, so they
/// disappear while an admin is viewing the app as another user. In that
/// case a banner above the tabs names the target user and offers the way
/// back.
pub fn nav_bar(session: &Session) -> Markup {
    let is_admin = session.is_admin_effective();
    let display_name = session
        .effective_user()
        .map(|user| user.display_name.as_str())
        .unwrap_or("");

    html! {
        @if session.is_impersonating()
        {
            div class=(BANNER_STYLE)
            {
                span { "Viewing as " strong { (display_name) } "." }

                form action=(endpoints::RETURN_TO_ADMIN) method="post"
                {
                    button type="submit" class=(LINK_STYLE) { "Return to admin" }
                }
            }
        }

        nav class=(NAV_STYLE)
        {
            a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Dashboard" }

            @if is_admin
            {
                a href=(endpoints::USERS_VIEW) class=(LINK_STYLE) { "Users" }
            }

            a href=(endpoints::REPORTS_VIEW) class=(LINK_STYLE) { "Reports" }
            a href=(endpoints::SETTINGS_VIEW) class=(LINK_STYLE) { "Settings" }

            span class="ml-auto" { (display_name) }

            form action=(endpoints::LOG_OUT) method="post"
            {
                button type="submit" class=(BUTTON_DELETE_STYLE) { "Log out" }
            }
        }
    }
}
