//! The 404 not found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
};

/// Render the 404 not found page.
pub async fn get_404_not_found() -> Response {
    not_found_response()
}

/// Build a response containing the 404 not found page.
pub fn not_found_response() -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Page not found" }
            p class="text-gray-600 dark:text-gray-400 mb-4"
            {
                "The page you were looking for does not exist."
            }
            a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Back to the dashboard" }
        }
    };

    (StatusCode::NOT_FOUND, base("Not Found", &content)).into_response()
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;

    use super::get_404_not_found;

    #[tokio::test]
    async fn returns_not_found_status() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
