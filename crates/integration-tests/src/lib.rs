//! Integration tests for Juniper Market.
//!
//! # Test Categories
//!
//! - `session_client` - Session client behavior against an in-process stub
//!   server: bearer attachment, 401-rotate-retry, single-flight rotation,
//!   logged-out fallback. These run with no external infrastructure.
//! - `storefront_flow` - End-to-end flows against a running API server and
//!   seeded database. Gated behind `#[ignore]`.
//!
//! # Running Tests
//!
//! ```bash
//! # Stub-server tests (no setup needed)
//! cargo test -p juniper-integration-tests
//!
//! # End-to-end tests (requires server + database)
//! cargo run -p juniper-cli -- migrate
//! cargo run -p juniper-cli -- seed
//! cargo run -p juniper-api &
//! cargo test -p juniper-integration-tests -- --ignored
//! ```

/// Base URL for the live API server (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("JUNIPER_API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}
