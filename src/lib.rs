//! Coinpurse is a web service for tracking personal income and expenses.
//!
//! This library provides a JSON REST API: authenticated owners record income
//! and expense transactions, and read them back as dashboards, rolling-window
//! summaries, per-category budget status and spreadsheet exports.
//!
//! Every income or expense write is mirrored into a unified transaction log;
//! the read paths aggregate over either the typed records or that log.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod aggregate;
mod auth;
mod db;
mod export;
mod ledger;
mod logging;
mod models;
mod report;
mod routes;
mod state;
mod stores;

pub use auth::{Claims, TokenKeys, issue_token};
pub use ledger::{FieldError, ValidationError};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use models::OwnerID;
pub use routes::build_router;
pub use state::AppState;
pub use stores::sqlite::{SqlAppState, create_app_state};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
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
    /// One or more fields in a write request failed validation.
    ///
    /// Nothing is persisted when this error is returned.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request did not carry a bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The bearer token could not be decoded or has expired.
    #[error("invalid or expired bearer token")]
    InvalidToken,

    /// A bearer token could not be created.
    ///
    /// The error string should only be logged on the server, never sent to
    /// the client.
    #[error("could not create bearer token: {0}")]
    TokenCreation(String),

    /// The requested record is absent, or belongs to another owner.
    ///
    /// The server does not reveal which of the two it is, so that clients
    /// cannot probe for other owners' records.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The export sheet could not be written out.
    #[error("could not write export sheet: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            Error::Validation(validation) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "Validation failed",
                    "fields": validation.fields,
                }),
            ),
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Missing bearer token"}),
            ),
            Error::InvalidToken => (
                StatusCode::FORBIDDEN,
                json!({"message": "Invalid or expired token"}),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                json!({"message": "Resource not found"}),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "Server error"}),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
