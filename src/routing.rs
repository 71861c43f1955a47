//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    reports::get_reports_page,
    session::{
        access_as_endpoint, get_log_in_page, post_log_in, post_log_out, return_to_admin_endpoint,
        session_guard,
    },
    settings::get_settings_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, update_transaction_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_edit_user_page, get_new_user_page,
        get_users_page, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::USERS_VIEW, get(get_users_page))
        .route(endpoints::NEW_USER_VIEW, get(get_new_user_page))
        .route(endpoints::EDIT_USER_VIEW, get(get_edit_user_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::UPDATE_TRANSACTION,
            post(update_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            post(delete_transaction_endpoint),
        )
        .route(endpoints::USERS_API, post(create_user_endpoint))
        .route(endpoints::UPDATE_USER, post(update_user_endpoint))
        .route(endpoints::DELETE_USER, post(delete_user_endpoint))
        .route(endpoints::ACCESS_AS, post(access_as_endpoint))
        .route(endpoints::RETURN_TO_ADMIN, post(return_to_admin_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        user::{NewUser, UserStore},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();

        state
            .user_store()
            .create(NewUser {
                username: "admin".to_owned(),
                secret: "205874".to_owned(),
                display_name: "Administrator".to_owned(),
                is_admin: true,
            })
            .unwrap();

        TestServer::new(build_router(state))
    }

    async fn log_in(server: &TestServer) {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "admin"), ("secret", "205874")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn anonymous_visitor_is_redirected_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_a_session() {
        let server = get_test_server();

        let response = server.get(endpoints::LOG_IN_VIEW).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn logging_in_unlocks_the_dashboard() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Dashboard");
    }

    #[tokio::test]
    async fn root_redirects_to_the_dashboard() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn logging_out_locks_the_dashboard_again() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server.post(endpoints::LOG_OUT).await;
        response.assert_status(StatusCode::SEE_OTHER);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn create_transaction_flow_ends_on_the_dashboard() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("code", "TRX100"),
                ("platform", "96B"),
                ("amount", "1500"),
                ("transaction_date", "2024-01-15"),
                ("status", "awaiting"),
                ("notes", ""),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_text_contains("TRX100");
    }

    #[tokio::test]
    async fn create_user_flow_ends_on_the_users_page() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "carol"),
                ("display_name", "Carol"),
                ("secret", "hunter2"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::USERS_VIEW);

        let response = server.get(endpoints::USERS_VIEW).await;
        response.assert_text_contains("Carol");
    }

    #[tokio::test]
    async fn unknown_route_renders_the_not_found_page() {
        let server = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text_contains("Page not found");
    }

    #[tokio::test]
    async fn unknown_endpoint_parameter_renders_the_not_found_page() {
        let server = get_test_server();
        log_in(&server).await;

        let response = server
            .get(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, 999))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
