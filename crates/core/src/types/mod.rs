//! Core types for Juniper Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{discounted_unit_price, to_minor_units};
pub use status::OrderStatus;
