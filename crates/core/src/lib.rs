//! Petcare Core - Shared order types.
//!
//! This crate provides the types used across the petcare order components:
//! - `orders` - Local order cache, remote order source and reconciliation
//! - `cli` - Command-line tools for syncing and managing orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for order IDs, prices, emails, and statuses,
//!   plus the [`Order`] record itself
//! - [`demo`] - Detection of seeded demo/test orders
//! - [`query`] - Filtering and sorting for order listings
//! - [`summary`] - Aggregate figures for the orders dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod demo;
pub mod query;
pub mod summary;
pub mod types;

pub use demo::is_demo;
pub use query::{OrderQuery, SortKey};
pub use summary::OrderSummary;
pub use types::*;
