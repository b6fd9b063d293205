//! Local order listing and edits.

use petcare_core::{NewOrder, Order, OrderId, OrderQuery, OrderStatus, OrderSummary};
use petcare_orders::{CachedOrders, Error, FileStore, OrderBook};
use tracing::{info, warn};

type Book = OrderBook<CachedOrders<FileStore>>;

/// One log line per order.
pub fn log_order(order: &Order) {
    info!(
        id = %order.id,
        date = %order.timestamp().format("%Y-%m-%d"),
        status = %order.status,
        kind = %order.order_type(),
        price = %order.price,
        quantity = order.quantity,
        buyer = %order.buyer_name,
        "{}",
        order.product_name
    );
}

/// Print cached orders matching `query`.
pub fn list(book: &Book, query: &OrderQuery) {
    let orders = query.apply(&book.orders());
    info!(count = orders.len(), "Cached orders");
    for order in &orders {
        log_order(order);
    }
}

/// Record a new order and print it.
///
/// # Errors
///
/// Returns an error if the cache cannot be written.
pub fn place(book: &mut Book, new_order: NewOrder) -> Result<(), Error> {
    let order = book.place(new_order)?;
    log_order(&order);
    Ok(())
}

/// Delete the given orders. Unknown ids are reported, not treated as errors.
///
/// # Errors
///
/// Returns an error if the cache cannot be written.
pub fn delete(book: &mut Book, ids: &[OrderId]) -> Result<(), Error> {
    let removed = book.delete(ids)?;
    if removed < ids.len() {
        warn!(
            requested = ids.len(),
            removed, "Some orders were not in the cache"
        );
    }
    info!(removed, "Deleted orders");
    Ok(())
}

/// Delete every cached order.
///
/// # Errors
///
/// Returns an error if the cache cannot be written.
pub fn clear(book: &mut Book) -> Result<(), Error> {
    let count = book.orders().len();
    book.clear()?;
    info!(removed = count, "Cleared all orders");
    Ok(())
}

/// Change one order's status.
///
/// # Errors
///
/// Returns `Error::NotFound` if the order is not cached, or a storage error
/// if the cache cannot be written.
pub fn set_status(book: &mut Book, id: &OrderId, status: OrderStatus) -> Result<(), Error> {
    if !book.set_status(id, status)? {
        return Err(Error::NotFound(id.to_string()));
    }
    info!(id = %id, %status, "Status updated");
    Ok(())
}

/// Print dashboard totals.
pub fn summary(book: &Book) {
    let summary = OrderSummary::from_orders(&book.orders());
    info!(
        total = summary.total,
        adoptions = summary.adoptions,
        purchases = summary.purchases,
        revenue = %summary.revenue,
        "Order summary"
    );
    for status in OrderStatus::ALL {
        let count = summary.count(status);
        if count > 0 {
            info!("  {status}: {count}");
        }
    }
}
