//! Inline alert fragments for reporting the outcome of an action.

use maud::{Markup, html};

use crate::html::{PAGE_CONTAINER_STYLE, base};

/// An alert reporting the outcome of an action.
pub enum Alert {
    /// The action failed. `message` is a short summary, `details` explains
    /// what the user can do about it.
    Error {
        /// A short summary of the problem.
        message: String,
        /// What the user can do about the problem.
        details: String,
    },
}

impl Alert {
    /// Create an error alert from a summary and details.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Error { message, details } => html! {
                div
                    role="alert"
                    class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                        dark:bg-gray-800 dark:text-red-400"
                {
                    span class="font-medium" { (message) }
                    " "
                    (details)
                }
            },
        }
    }
}

/// The full page shown when a session tries to open a page it is not allowed
/// to see.
pub(crate) fn forbidden_page() -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Not allowed" }
            p class="text-gray-600 dark:text-gray-400"
            {
                "Your account is not allowed to view this page."
            }
        }
    };

    base("Not Allowed", &content)
}
