//! The reports page.

use axum::extract::State;
use maud::{Markup, html};

use crate::{
    AppState,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::nav_bar,
};

/// Display the reports page.
///
/// Reporting has not been built yet, the page only reserves the navigation
/// slot so that the tab layout stays stable.
pub async fn get_reports_page(State(state): State<AppState>) -> Markup {
    let session = state.session.current();

    let content = html! {
        (nav_bar(&session))

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Reports" }
            p class="text-gray-600 dark:text-gray-400"
            {
                "Reports are not available yet."
            }
        }
    };

    base("Reports", &content)
}

#[cfg(test)]
mod reports_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, session::test_utils::test_user};

    use super::get_reports_page;

    #[tokio::test]
    async fn reports_page_renders_with_navigation() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        state
            .session
            .with_mut(|session| session.log_in(test_user(1, "alice", false)));

        let app = Router::new()
            .route(endpoints::REPORTS_VIEW, get(get_reports_page))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server.get(endpoints::REPORTS_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Reports are not available yet.");
        response.assert_text_contains("Dashboard");
    }
}
