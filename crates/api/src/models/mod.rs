//! Domain types for the API.
//!
//! These are validated domain objects; the repositories in [`crate::db`]
//! load and store them. Wire-facing shapes live in `juniper_core::wire`.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine, CartView};
pub use order::{Order, OrderItem, OrderLineSnapshot, OrderWithItems};
pub use product::Product;
pub use user::User;
