//! Backend order API.
//!
//! The backend exposes two endpoints this crate consumes:
//!
//! - `GET /health` - `{ "database": "<status>" }`
//! - `GET /orders/user/{email}` - the user's orders in one of three shapes
//!
//! Both are wrapped behind [`OrderSource`] so the reconciler can be driven
//! by a fake in tests.
//!
//! # Failure semantics
//!
//! Callers treat every error here as "the backend had nothing to say". No
//! request is retried; the user refreshes manually.

mod client;
mod payload;

use std::future::Future;

use petcare_core::{Email, Order};
use thiserror::Error;

pub use client::HttpOrderSource;
pub use payload::{HealthResponse, database_is_connected, parse_orders_response};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed (connect, timeout, or body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// The base URL cannot have path segments appended.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Source of the user's orders as known to the backend.
pub trait OrderSource {
    /// Whether the backend and its database are up.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the health endpoint cannot be reached or
    /// answers with a non-success status.
    fn health(&self) -> impl Future<Output = Result<bool, RemoteError>> + Send;

    /// All orders the backend holds for `email`, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails. A successful response
    /// with an unrecognised body yields `Ok` with no orders.
    fn fetch_orders(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Vec<Order>, RemoteError>> + Send;
}
