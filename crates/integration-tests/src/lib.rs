//! Integration tests for petcare order sync.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p petcare-integration-tests
//! ```
//!
//! The tests need no external services. [`FakeBackend`] serves the two
//! backend endpoints from an in-process axum server on an ephemeral port,
//! and [`temp_data_dir`] gives each test its own on-disk cache.

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

/// Mutable behaviour of the fake backend.
#[derive(Debug)]
pub struct BackendState {
    database: Mutex<String>,
    orders_status: Mutex<StatusCode>,
    orders_body: Mutex<Value>,
    health_delay: Mutex<Duration>,
    last_email: Mutex<Option<String>>,
    health_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            database: Mutex::new("connected".to_string()),
            orders_status: Mutex::new(StatusCode::OK),
            orders_body: Mutex::new(json!([])),
            health_delay: Mutex::new(Duration::ZERO),
            last_email: Mutex::new(None),
            health_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn health(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state.health_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *lock(&state.health_delay);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let database = lock(&state.database).clone();
    Json(json!({ "status": "ok", "database": database }))
}

async fn user_orders(
    State(state): State<Arc<BackendState>>,
    Path(email): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.fetch_calls.fetch_add(1, Ordering::SeqCst);
    *lock(&state.last_email) = Some(email);
    let status = *lock(&state.orders_status);
    let body = lock(&state.orders_body).clone();
    (status, Json(body))
}

/// In-process stand-in for the backend order API, mounted under `/api`.
#[derive(Debug)]
pub struct FakeBackend {
    state: Arc<BackendState>,
    addr: SocketAddr,
}

impl FakeBackend {
    /// Start serving on `127.0.0.1` with a random port.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/orders/user/{email}", get(user_orders))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend stopped");
        });

        Self { state, addr }
    }

    /// API root to configure the client with.
    #[must_use]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("Invalid fake backend URL")
    }

    /// Value reported in the health response's `database` field.
    pub fn set_database(&self, status: &str) {
        *lock(&self.state.database) = status.to_string();
    }

    /// Body returned by the orders endpoint.
    pub fn set_orders(&self, body: Value) {
        *lock(&self.state.orders_body) = body;
    }

    /// Status code returned by the orders endpoint.
    pub fn set_orders_status(&self, status: StatusCode) {
        *lock(&self.state.orders_status) = status;
    }

    /// Make the health endpoint stall before answering.
    pub fn set_health_delay(&self, delay: Duration) {
        *lock(&self.state.health_delay) = delay;
    }

    #[must_use]
    pub fn health_calls(&self) -> usize {
        self.state.health_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.state.fetch_calls.load(Ordering::SeqCst)
    }

    /// Decoded email path segment of the most recent orders request.
    #[must_use]
    pub fn last_email(&self) -> Option<String> {
        lock(&self.state.last_email).clone()
    }
}

/// A fresh, empty directory for an on-disk order cache.
#[must_use]
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("petcare-it-{}", uuid::Uuid::new_v4()))
}

/// An API URL nothing is listening on.
pub async fn unreachable_api_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    Url::parse(&format!("http://{addr}/api")).expect("Invalid probe URL")
}
