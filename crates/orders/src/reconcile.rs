//! Merging the cached order list with the backend's copy.
//!
//! # Algorithm
//!
//! 1. Read the cache and drop demo records.
//! 2. Without a user email, stop there: no network access.
//! 3. Ask the backend for its health. If it is down or the check fails,
//!    return the cached orders and leave the cache untouched.
//! 4. Fetch the user's orders and drop demo records. A failed fetch counts
//!    as an empty response.
//! 5. Merge by id, cache first then backend. The backend copy replaces a
//!    cached copy wholesale; a record keeps the position of its first
//!    occurrence.
//! 6. Write the merged list back to the cache and return it.
//!
//! Reconciliation never fails. Every error degrades to the best data at
//! hand and is logged.

use std::collections::{HashMap, HashSet};

use petcare_core::demo::without_demo;
use petcare_core::{Email, Order, OrderId};
use tracing::{info, instrument, warn};

use crate::book::OrderBook;
use crate::remote::OrderSource;
use crate::store::OrderStore;

/// How a reconciliation went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No user email; only the cache was consulted.
    LocalOnly,
    /// The backend was unhealthy or unreachable; cached orders returned.
    RemoteUnavailable,
    /// The backend answered and the merge was written back.
    Synced {
        /// Backend orders that were not cached before.
        new_orders: usize,
        /// Cached orders the backend replaced with a different version.
        updated: usize,
    },
}

impl SyncOutcome {
    /// Short notification text for the user.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::LocalOnly | Self::RemoteUnavailable => "Using cached orders".to_string(),
            Self::Synced { new_orders: 0, updated: 0 } => "Orders are up to date".to_string(),
            Self::Synced {
                new_orders: 0,
                updated,
            } => format!("Updated {updated} orders"),
            Self::Synced { new_orders, .. } => format!("Synced {new_orders} new orders"),
        }
    }

    /// Whether the backend contributed to the result.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }
}

/// Result of [`Reconciler::reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// De-duplicated orders without demo records, in merge order.
    pub orders: Vec<Order>,
    pub outcome: SyncOutcome,
}

/// Merge two order lists by id.
///
/// `local` is inserted first, then `remote`. A later record with an id
/// already present replaces the earlier one in place, so duplicates within
/// one list resolve to the last occurrence and the backend wins over the
/// cache. There is no field-level merge.
#[must_use]
pub fn merge_orders(local: Vec<Order>, remote: Vec<Order>) -> Vec<Order> {
    let mut slots: HashMap<OrderId, usize> = HashMap::with_capacity(local.len() + remote.len());
    let mut merged: Vec<Order> = Vec::with_capacity(local.len() + remote.len());

    for order in local.into_iter().chain(remote) {
        if let Some(existing) = slots
            .get(&order.id)
            .copied()
            .and_then(|slot| merged.get_mut(slot))
        {
            *existing = order;
        } else {
            slots.insert(order.id.clone(), merged.len());
            merged.push(order);
        }
    }

    merged
}

/// Count backend orders that are new to the cache, and cached orders the
/// backend changed.
fn count_changes(
    local: &[Order],
    merged: &[Order],
    remote_ids: &HashSet<OrderId>,
) -> (usize, usize) {
    let cached: HashMap<&OrderId, &Order> = local.iter().map(|order| (&order.id, order)).collect();

    merged
        .iter()
        .filter(|order| remote_ids.contains(&order.id))
        .fold((0, 0), |(new, updated), order| match cached.get(&order.id) {
            None => (new + 1, updated),
            Some(previous) if *previous != order => (new, updated + 1),
            Some(_) => (new, updated),
        })
}

/// Keeps the order cache in step with the backend.
///
/// Owns the [`OrderBook`] so that local edits and reconciliation go through
/// one value. `reconcile` takes `&mut self`: two reconciliations through
/// the same reconciler cannot overlap and race on the cache write.
#[derive(Debug)]
pub struct Reconciler<S, R> {
    book: OrderBook<S>,
    source: R,
}

impl<S: OrderStore, R: OrderSource> Reconciler<S, R> {
    #[must_use]
    pub const fn new(store: S, source: R) -> Self {
        Self {
            book: OrderBook::new(store),
            source,
        }
    }

    /// Local order operations.
    #[must_use]
    pub const fn book(&self) -> &OrderBook<S> {
        &self.book
    }

    /// Local order operations that modify the cache.
    pub const fn book_mut(&mut self) -> &mut OrderBook<S> {
        &mut self.book
    }

    /// The backend this reconciler syncs with.
    #[must_use]
    pub const fn source(&self) -> &R {
        &self.source
    }

    /// Merge the cache with the backend's orders for `email`.
    ///
    /// See the [module docs](self) for the exact steps.
    #[instrument(skip_all, fields(email = email.map_or("-", Email::as_str)))]
    pub async fn reconcile(&mut self, email: Option<&Email>) -> Reconciliation {
        let local = self.book.orders();

        let Some(email) = email else {
            return Reconciliation {
                orders: local,
                outcome: SyncOutcome::LocalOnly,
            };
        };

        match self.source.health().await {
            Ok(true) => {}
            Ok(false) => {
                info!(local = local.len(), "Backend unhealthy, using cached orders");
                return Reconciliation {
                    orders: local,
                    outcome: SyncOutcome::RemoteUnavailable,
                };
            }
            Err(e) => {
                warn!(error = %e, local = local.len(), "Health check failed, using cached orders");
                return Reconciliation {
                    orders: local,
                    outcome: SyncOutcome::RemoteUnavailable,
                };
            }
        }

        let (remote, fetched) = match self.source.fetch_orders(email).await {
            Ok(remote) => (without_demo(remote), true),
            Err(e) => {
                warn!(error = %e, "Fetching remote orders failed, treating as empty");
                (Vec::new(), false)
            }
        };

        let remote_ids: HashSet<OrderId> = remote.iter().map(|order| order.id.clone()).collect();
        let remote_count = remote.len();
        let merged = merge_orders(local.clone(), remote);
        let (new_orders, updated) = count_changes(&local, &merged, &remote_ids);

        if let Err(e) = self.book.store().write(&merged) {
            warn!(error = %e, "Failed to write merged orders to cache");
        }

        info!(
            local = local.len(),
            remote = remote_count,
            merged = merged.len(),
            new_orders,
            updated,
            "Orders reconciled"
        );

        Reconciliation {
            orders: merged,
            outcome: if fetched {
                SyncOutcome::Synced {
                    new_orders,
                    updated,
                }
            } else {
                SyncOutcome::RemoteUnavailable
            },
        }
    }
}
