//! Reconcile the local order cache with the backend.

use petcare_core::Email;
use petcare_orders::LocalReconciler;
use tracing::{info, warn};

use super::orders::log_order;

/// Run one reconciliation and report the outcome.
///
/// Never fails: an unreachable backend falls back to the cached orders.
pub async fn run(reconciler: &mut LocalReconciler, email: Option<&Email>) {
    if email.is_none() {
        warn!("No email given (--email or PETCARE_USER_EMAIL), showing cached orders only");
    }

    let result = reconciler.reconcile(email).await;

    info!(orders = result.orders.len(), "{}", result.outcome.notice());
    for order in &result.orders {
        log_order(order);
    }
}
