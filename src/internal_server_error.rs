//! The 500 internal server error page.

use axum::http::StatusCode;
use maud::Markup;
use maud::html;

use crate::html::{PAGE_CONTAINER_STYLE, base};

/// Render the 500 internal server error page.
pub(crate) fn render_internal_server_error() -> (StatusCode, Markup) {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Something went wrong" }
            p class="text-gray-600 dark:text-gray-400"
            {
                "An unexpected error occurred, check the server logs for more details."
            }
        }
    };

    (StatusCode::INTERNAL_SERVER_ERROR, base("Error", &content))
}
