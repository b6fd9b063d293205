//! End-to-end order reconciliation against the fake backend and an on-disk
//! cache.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use petcare_core::{Email, Order, OrderId, OrderQuery, OrderStatus, SortKey};
use petcare_integration_tests::{FakeBackend, temp_data_dir, unreachable_api_url};
use petcare_orders::store::keys;
use petcare_orders::{
    CachedOrders, FileStore, KeyValueStore, LocalReconciler, OrderStore, SyncConfig, SyncOutcome,
};
use serde_json::{Value, json};
use url::Url;

fn config(api_url: Url, data_dir: &Path) -> SyncConfig {
    SyncConfig {
        api_url,
        data_dir: data_dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
        user_email: None,
    }
}

fn open(api_url: Url, data_dir: &Path) -> LocalReconciler {
    petcare_orders::open(&config(api_url, data_dir)).unwrap()
}

fn seed_cache(data_dir: &Path, orders: &Value) {
    FileStore::open(data_dir)
        .unwrap()
        .set(keys::MY_ORDERS, &orders.to_string())
        .unwrap();
}

fn raw_cache(data_dir: &Path) -> Option<String> {
    FileStore::open(data_dir).unwrap().get(keys::MY_ORDERS).unwrap()
}

fn cached_ids(data_dir: &Path) -> Vec<String> {
    CachedOrders::new(FileStore::open(data_dir).unwrap())
        .read()
        .into_iter()
        .map(|o| o.id.into_inner())
        .collect()
}

fn ids(orders: &[Order]) -> Vec<&str> {
    orders.iter().map(|o| o.id.as_str()).collect()
}

fn email() -> Email {
    Email::parse("owner@example.com").unwrap()
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!([
        { "id": "B", "status": "shipped", "price": 30 },
        { "id": "C", "productName": "Cat Tree" }
    ]));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }, { "id": "B", "status": "pending" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let mut first = reconciler.reconcile(Some(&email())).await.orders;
    let mut second = reconciler.reconcile(Some(&email())).await.orders;

    first.sort_by(|a, b| a.id.cmp(&b.id));
    second.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(ids(&first), ["A", "B", "C"]);
    assert_eq!(backend.fetch_calls(), 2);
}

#[tokio::test]
async fn test_demo_records_never_surface() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!({ "orders": [
        { "id": "R1" },
        { "id": "R2", "source": "demo" },
        { "id": "demo-order-5" },
        { "id": "R3", "productName": "Test Product" },
        { "id": "R4", "email": "test@petcare.dev" }
    ]}));
    let dir = temp_data_dir();
    seed_cache(
        &dir,
        &json!([
            { "id": "L1", "source": "user" },
            { "id": "test-9" },
            { "id": "L2", "buyerName": "Demo User" }
        ]),
    );

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["L1", "R1"]);
    assert_eq!(cached_ids(&dir), ["L1", "R1"]);
}

#[tokio::test]
async fn test_remote_version_wins() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!([{ "id": "A", "status": "delivered" }]));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A", "status": "pending", "phone": "555-0100" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(result.orders.len(), 1);
    assert_eq!(result.orders[0].status, OrderStatus::Delivered);
    assert_eq!(result.orders[0].phone, "");
    assert_eq!(
        result.outcome,
        SyncOutcome::Synced {
            new_orders: 0,
            updated: 1
        }
    );
}

#[tokio::test]
async fn test_unhealthy_backend_is_not_fetched() {
    let backend = FakeBackend::start().await;
    backend.set_database("disconnected");
    backend.set_orders(json!([{ "id": "B" }]));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }, { "id": "demo-order-1" }]));
    let before = raw_cache(&dir);

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(result.outcome, SyncOutcome::RemoteUnavailable);
    assert_eq!(backend.health_calls(), 1);
    assert_eq!(backend.fetch_calls(), 0);
    assert_eq!(raw_cache(&dir), before);
}

#[tokio::test]
async fn test_empty_cache_bootstrap() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!([{ "id": "B" }]));
    let dir = temp_data_dir();
    assert!(raw_cache(&dir).is_none());

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["B"]);
    assert_eq!(cached_ids(&dir), ["B"]);
    assert_eq!(result.outcome.notice(), "Synced 1 new orders");
}

#[tokio::test]
async fn test_sorting_reconciled_orders_with_missing_date() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!({ "data": [
        { "id": "late", "date": "2024-05-02T10:00:00Z", "price": "12" },
        { "id": "undated", "price": null },
        { "id": "early", "createdAt": "2024-01-15T08:30:00.000Z", "price": 40 }
    ]}));
    let dir = temp_data_dir();

    let mut reconciler = open(backend.api_url(), &dir);
    let orders = reconciler.reconcile(Some(&email())).await.orders;

    let by_date = OrderQuery {
        sort: Some(SortKey::DateAsc),
        ..OrderQuery::default()
    };
    assert_eq!(ids(&by_date.apply(&orders)), ["undated", "early", "late"]);

    let by_price = OrderQuery {
        sort: Some(SortKey::PriceDesc),
        ..OrderQuery::default()
    };
    assert_eq!(ids(&by_price.apply(&orders)), ["early", "late", "undated"]);
}

#[tokio::test]
async fn test_delete_then_reconcile_with_unhealthy_backend() {
    let backend = FakeBackend::start().await;
    backend.set_database("disconnected");
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }, { "id": "B" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let removed = reconciler
        .book_mut()
        .delete(&[OrderId::parse("A").unwrap()])
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(cached_ids(&dir), ["B"]);

    let result = reconciler.reconcile(Some(&email())).await;
    assert_eq!(ids(&result.orders), ["B"]);
}

#[tokio::test]
async fn test_unrecognised_payload_counts_as_empty() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!({ "message": "no orders here" }));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(
        result.outcome,
        SyncOutcome::Synced {
            new_orders: 0,
            updated: 0
        }
    );
}

#[tokio::test]
async fn test_orders_endpoint_error_falls_back_to_cache() {
    let backend = FakeBackend::start().await;
    backend.set_orders_status(StatusCode::INTERNAL_SERVER_ERROR);
    backend.set_orders(json!([{ "id": "B" }]));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(result.outcome, SyncOutcome::RemoteUnavailable);
    assert_eq!(cached_ids(&dir), ["A"]);
}

#[tokio::test]
async fn test_unreachable_backend_falls_back_to_cache() {
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }]));

    let mut reconciler = open(unreachable_api_url().await, &dir);
    let result = reconciler.reconcile(Some(&email())).await;

    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(result.outcome.notice(), "Using cached orders");
}

#[tokio::test]
async fn test_hung_health_check_is_bounded_by_timeout() {
    let backend = FakeBackend::start().await;
    backend.set_health_delay(Duration::from_secs(5));
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }]));

    let mut cfg = config(backend.api_url(), &dir);
    cfg.request_timeout = Duration::from_secs(1);
    let mut reconciler = petcare_orders::open(&cfg).unwrap();

    let started = Instant::now();
    let result = reconciler.reconcile(Some(&email())).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(result.outcome, SyncOutcome::RemoteUnavailable);
    assert_eq!(backend.fetch_calls(), 0);
}

#[tokio::test]
async fn test_no_email_skips_network() {
    let backend = FakeBackend::start().await;
    let dir = temp_data_dir();
    seed_cache(&dir, &json!([{ "id": "A" }]));

    let mut reconciler = open(backend.api_url(), &dir);
    let result = reconciler.reconcile(None).await;

    assert_eq!(ids(&result.orders), ["A"]);
    assert_eq!(result.outcome, SyncOutcome::LocalOnly);
    assert_eq!(backend.health_calls(), 0);
}

#[tokio::test]
async fn test_email_sent_as_single_path_segment() {
    let backend = FakeBackend::start().await;
    let dir = temp_data_dir();
    let email = Email::parse("first.last+cats@example.com").unwrap();

    let mut reconciler = open(backend.api_url(), &dir);
    reconciler.reconcile(Some(&email)).await;

    assert_eq!(backend.last_email().as_deref(), Some("first.last+cats@example.com"));
}

#[tokio::test]
async fn test_corrupt_cache_is_replaced_on_sync() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!([{ "id": "B" }]));
    let dir = temp_data_dir();
    FileStore::open(&dir)
        .unwrap()
        .set(keys::MY_ORDERS, "{\"truncated\": [")
        .unwrap();

    let mut reconciler = open(backend.api_url(), &dir);
    assert!(reconciler.book().orders().is_empty());

    let result = reconciler.reconcile(Some(&email())).await;
    assert_eq!(ids(&result.orders), ["B"]);
    assert_eq!(cached_ids(&dir), ["B"]);
}

#[tokio::test]
async fn test_backend_fields_survive_the_cache() {
    let backend = FakeBackend::start().await;
    backend.set_orders(json!([{
        "_id": "65f0c0ffee",
        "productName": "Aquarium Kit",
        "trackingNumber": "1Z999AA10123456784",
        "items": [{ "sku": "AQ-20G", "qty": 1 }]
    }]));
    let dir = temp_data_dir();

    let mut reconciler = open(backend.api_url(), &dir);
    reconciler.reconcile(Some(&email())).await;

    let cached: Value = serde_json::from_str(&raw_cache(&dir).unwrap()).unwrap();
    assert_eq!(cached[0]["id"], json!("65f0c0ffee"));
    assert_eq!(cached[0]["trackingNumber"], json!("1Z999AA10123456784"));
    assert_eq!(cached[0]["items"][0]["sku"], json!("AQ-20G"));
}
