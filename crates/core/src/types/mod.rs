//! Core types for petcare orders.
//!
//! This module provides type-safe wrappers for the order domain.

pub mod email;
pub mod id;
mod lenient;
pub mod order;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, OrderIdError};
pub use order::{NewOrder, Order};
pub use price::Price;
pub use status::*;
