//! Domain services.
//!
//! Services own the business rules and compose repositories, the token
//! layer, and the payment-provider client. Route handlers stay thin.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod tokens;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService};
pub use tokens::{TokenError, TokenPair, TokenService};
