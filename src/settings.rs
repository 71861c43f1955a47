//! The settings page.

use axum::extract::State;
use maud::{Markup, html};

use crate::{
    AppState,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::nav_bar,
};

/// Display the settings page.
///
/// There are no per-user settings yet, the page only reserves the navigation
/// slot so that the tab layout stays stable.
pub async fn get_settings_page(State(state): State<AppState>) -> Markup {
    let session = state.session.current();

    let content = html! {
        (nav_bar(&session))

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Settings" }
            p class="text-gray-600 dark:text-gray-400"
            {
                "There are no settings to change yet."
            }
        }
    };

    base("Settings", &content)
}

#[cfg(test)]
mod settings_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, session::test_utils::test_user};

    use super::get_settings_page;

    #[tokio::test]
    async fn settings_page_renders_with_navigation() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        state
            .session
            .with_mut(|session| session.log_in(test_user(1, "alice", false)));

        let app = Router::new()
            .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server.get(endpoints::SETTINGS_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("There are no settings to change yet.");
        response.assert_text_contains("Dashboard");
    }
}
