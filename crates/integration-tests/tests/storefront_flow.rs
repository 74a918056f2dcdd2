//! End-to-end storefront flows against a running API server.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p juniper-cli -- migrate`)
//! - A seeded catalog (`cargo run -p juniper-cli -- seed`)
//! - The API server running (`cargo run -p juniper-api`)
//!
//! Run with: `cargo test -p juniper-integration-tests -- --ignored`

use std::time::{SystemTime, UNIX_EPOCH};

use juniper_client::{ApiClient, MemoryTokenStore};
use juniper_core::ProductId;
use juniper_core::wire::RegisterRequest;
use juniper_integration_tests::api_base_url;
use rust_decimal::Decimal;

/// A username unique enough for repeated runs against the same database.
fn unique_username(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    format!("{prefix}-{nanos}")
}

/// Register a throwaway user and return a logged-in client.
async fn registered_client() -> ApiClient {
    let client = ApiClient::new(api_base_url(), MemoryTokenStore::new()).expect("client");

    let username = unique_username("shopper");
    let request = RegisterRequest {
        username: username.clone(),
        email: format!("{username}@example.com"),
        password: "a sufficiently long password".to_owned(),
        language: None,
    };

    let user = client.register(&request).await.expect("register");
    assert_eq!(user.username, username);

    client
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_register_login_and_me_roundtrip() {
    let client = registered_client().await;

    let me = client.current_user().await.expect("current_user");
    assert!(me.is_some());

    client.logout().await.expect("logout");
    let me = client.current_user().await.expect("current_user after logout");
    assert_eq!(me, None);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_cart_merge_and_totals() {
    let client = registered_client().await;

    // Same product twice: one line, summed quantity.
    client
        .add_cart_item(ProductId::new(1), 2)
        .await
        .expect("first add");
    let line = client
        .add_cart_item(ProductId::new(1), 3)
        .await
        .expect("second add");
    assert_eq!(line.quantity, 5);

    let cart = client.cart_items().await.expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_items, 5);

    // Subtotal is the sum of line totals.
    let expected: Decimal = cart.items.iter().map(|i| i.line_total).sum();
    assert_eq!(cart.subtotal, expected);

    client.clear_cart().await.expect("clear");
    let cart = client.cart_items().await.expect("cart after clear");
    assert!(cart.items.is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_quantity_below_one_is_rejected() {
    let client = registered_client().await;

    let line = client
        .add_cart_item(ProductId::new(2), 1)
        .await
        .expect("add");

    let err = client.update_cart_item(line.id, 0).await.expect_err("zero quantity");
    assert!(matches!(
        err,
        juniper_client::ClientError::Api { status: 400, .. }
    ));

    // Stored quantity unchanged.
    let cart = client.cart_items().await.expect("cart");
    let found = cart.items.iter().find(|i| i.id == line.id).expect("line");
    assert_eq!(found.quantity, 1);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_foreign_cart_item_is_invisible() {
    let owner = registered_client().await;
    let attacker = registered_client().await;

    let line = owner
        .add_cart_item(ProductId::new(1), 1)
        .await
        .expect("add");

    // Another user's item id behaves exactly like a nonexistent one.
    let err = attacker
        .remove_cart_item(line.id)
        .await
        .expect_err("foreign remove");
    assert!(matches!(
        err,
        juniper_client::ClientError::Api { status: 404, .. }
    ));

    let cart = owner.cart_items().await.expect("owner cart");
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_unknown_product_is_rejected() {
    let client = registered_client().await;

    let err = client
        .add_cart_item(ProductId::new(999_999), 1)
        .await
        .expect_err("unknown product");
    assert!(matches!(
        err,
        juniper_client::ClientError::Api { status: 404, .. }
    ));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_promo_validation() {
    let client = ApiClient::new(api_base_url(), MemoryTokenStore::new()).expect("client");

    let known = client.validate_promo("WELCOME10").await.expect("known code");
    assert!(known.valid);
    assert!(known.discount.is_some());

    let unknown = client.validate_promo("NOTACODE").await.expect("unknown code");
    assert!(!unknown.valid);
    assert!(unknown.discount.is_none());
}

#[tokio::test]
#[ignore = "Requires running API server, seeded database, and payment provider credentials"]
async fn test_payment_intent_creation() {
    let client = ApiClient::new(api_base_url(), MemoryTokenStore::new()).expect("client");

    let secret = client
        .create_payment_intent("25.00".parse().expect("decimal"))
        .await
        .expect("create intent");

    assert!(!secret.is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and seeded database"]
async fn test_order_history_starts_empty() {
    let client = registered_client().await;

    let orders = client.orders().await.expect("orders");
    assert!(orders.is_empty());
}
