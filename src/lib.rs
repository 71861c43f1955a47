//! Transtrack is a small single-tenant web dashboard for tracking platform
//! withdrawal transactions.
//!
//! Users log in with a username and secret, admins manage the other users,
//! and every user records transactions (code, platform, amount, date,
//! status). Admins see every transaction and can temporarily "access as"
//! another user, which scopes the whole dashboard down to that user's
//! records.
//!
//! This library provides a server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod reports;
mod routing;
mod session;
mod settings;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use session::Session;
pub use transaction::{
    Platform, SqliteTransactionStore, Status, TransactionDraft, TransactionStore,
};
pub use user::{NewUser, SqliteUserStore, User, UserId, UserStore};

use crate::{
    internal_server_error::render_internal_server_error, not_found::not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested record could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// The secret entered at log-in did not match the stored secret.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A transaction with the same non-empty code already exists.
    ///
    /// Transaction codes identify a withdrawal on the external platform, so
    /// two records with the same code would track the same event twice.
    #[error("a transaction with the code \"{0}\" already exists")]
    DuplicateCode(String),

    /// The username used to create or update a user is already taken.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An admin tried to delete their own user record.
    ///
    /// Allowing this would leave the application without the admin that is
    /// currently operating it, so the deletion is rejected outright.
    #[error("a user cannot delete their own account")]
    SelfDeleteForbidden,

    /// The current session lacks the rights for the attempted operation.
    ///
    /// This covers both anonymous sessions calling authenticated operations
    /// and non-admin sessions calling admin-only operations.
    #[error("the current session is not allowed to perform this operation")]
    Forbidden,

    /// The platform string is not one of the known platforms.
    #[error("\"{0}\" is not a known platform")]
    InvalidPlatform(String),

    /// A negative amount was used to create or update a transaction.
    #[error("{0} is negative, transaction amounts must be zero or more")]
    NegativeAmount(f64),

    /// An opaque failure reported by the record store.
    #[error("the record store reported an error: {0}")]
    Backend(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.username") =>
            {
                Error::DuplicateUsername(String::new())
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("transaction.code") =>
            {
                Error::DuplicateCode(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::Backend(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found_response(),
            Error::Forbidden => {
                (StatusCode::FORBIDDEN, alert::forbidden_page()).into_response()
            }
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error().into_response()
            }
        }
    }
}
