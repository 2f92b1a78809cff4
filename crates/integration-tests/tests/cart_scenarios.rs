//! Integration tests for cart store behaviour.
//!
//! These drive the store through its public API with in-memory collaborators
//! and check the cart, the persisted snapshot, and the notifications shown.

use rocket_shoes_cart::{CartError, DEFAULT_STORAGE_KEY, KeyValueStore, Severity, UpdateProductAmount};
use rocket_shoes_core::{Product, ProductId};
use rocket_shoes_integration_tests::{Fixture, line};

fn update(id: i64, amount: i64) -> UpdateProductAmount {
    UpdateProductAmount {
        product_id: ProductId::new(id),
        amount,
    }
}

fn persisted(fixture: &Fixture) -> Vec<Product> {
    let raw = fixture
        .storage
        .get(DEFAULT_STORAGE_KEY)
        .expect("storage readable")
        .expect("cart persisted");
    serde_json::from_str(&raw).expect("persisted cart is valid JSON")
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_cart() {
    let mut fx = Fixture::with_stock(5);

    fx.store.add_product(ProductId::new(1)).await;

    assert_eq!(fx.store.cart(), &[line(1, 1)]);
    assert_eq!(persisted(&fx), vec![line(1, 1)]);
    assert!(fx.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_add_twice_increments_amount() {
    let mut fx = Fixture::with_stock(5);

    fx.store.add_product(ProductId::new(2)).await;
    fx.store.add_product(ProductId::new(2)).await;

    assert_eq!(fx.store.cart(), &[line(2, 2)]);
    assert_eq!(fx.store.item_count(), 2);
}

#[tokio::test]
async fn test_add_stops_at_stock_limit() {
    let mut fx = Fixture::with_stock(2);

    for _ in 0..3 {
        fx.store.add_product(ProductId::new(3)).await;
    }

    assert_eq!(fx.store.cart(), &[line(3, 2)]);
    assert_eq!(
        fx.notifier.messages(),
        vec!["Requested quantity out of stock"]
    );
}

// =============================================================================
// Remove
// =============================================================================

#[tokio::test]
async fn test_remove_nonexistent_leaves_cart_unchanged() {
    let mut fx = Fixture::with_stock(5);
    fx.store.add_product(ProductId::new(1)).await;

    fx.store.remove_product(ProductId::new(4));

    assert_eq!(fx.store.cart(), &[line(1, 1)]);
    let notifications = fx.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Error removing product");
    assert_eq!(notifications[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_remove_then_add_goes_to_the_end() {
    let mut fx = Fixture::with_stock(5);
    fx.store.add_product(ProductId::new(1)).await;
    fx.store.add_product(ProductId::new(2)).await;

    fx.store.remove_product(ProductId::new(1));
    fx.store.add_product(ProductId::new(1)).await;

    assert_eq!(fx.store.cart(), &[line(2, 1), line(1, 1)]);
}

// =============================================================================
// Update amount
// =============================================================================

#[tokio::test]
async fn test_update_with_zero_or_negative_amount() {
    let mut fx = Fixture::with_stock(5);
    fx.store.add_product(ProductId::new(1)).await;

    fx.store.update_product_amount(update(1, 0)).await;
    fx.store.update_product_amount(update(1, -1)).await;

    assert_eq!(fx.store.cart(), &[line(1, 1)]);
    assert_eq!(
        fx.notifier.messages(),
        vec!["Invalid product amount", "Invalid product amount"]
    );
}

#[tokio::test]
async fn test_update_above_stock_is_rejected() {
    let mut fx = Fixture::with_stock(5);
    fx.store.add_product(ProductId::new(1)).await;
    fx.catalog.set_stock(ProductId::new(1), 3);

    fx.store.update_product_amount(update(1, 10)).await;

    assert_eq!(fx.store.cart(), &[line(1, 1)]);
    assert_eq!(persisted(&fx), vec![line(1, 1)]);
    assert_eq!(
        fx.notifier.messages(),
        vec!["Requested quantity out of stock"]
    );
}

#[tokio::test]
async fn test_update_product_not_in_cart() {
    let mut fx = Fixture::with_stock(5);

    let err = fx
        .store
        .try_update_product_amount(update(6, 2))
        .await
        .expect_err("product 6 is not in the cart");

    assert!(matches!(err, CartError::NotFoundInCart { .. }));
    assert!(fx.store.cart().is_empty());
    assert!(fx.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_update_reads_fresh_stock_every_time() {
    let mut fx = Fixture::with_stock(5);
    fx.store.add_product(ProductId::new(1)).await;

    fx.store.update_product_amount(update(1, 4)).await;
    assert!(fx.notifier.drain().is_empty());

    fx.catalog.set_stock(ProductId::new(1), 2);
    fx.store.update_product_amount(update(1, 3)).await;

    assert_eq!(fx.store.cart(), &[line(1, 4)]);
    let shown = fx.notifier.drain();
    let [notification] = shown.as_slice() else {
        panic!("expected one notification, got {shown:?}");
    };
    assert_eq!(notification.message, "Requested quantity out of stock");
    assert_eq!(notification.severity, Severity::Error);
    assert!(fx.notifier.messages().is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_reload_restores_identical_cart() {
    let mut fx = Fixture::with_stock(10);
    fx.store.add_product(ProductId::new(3)).await;
    fx.store.add_product(ProductId::new(1)).await;
    fx.store.add_product(ProductId::new(5)).await;
    fx.store.update_product_amount(update(1, 4)).await;
    fx.store.remove_product(ProductId::new(5));

    let reloaded = fx.reload();

    assert_eq!(reloaded.cart(), fx.store.cart());
    assert_eq!(reloaded.cart(), &[line(3, 1), line(1, 4)]);
}

#[tokio::test]
async fn test_failures_do_not_touch_storage() {
    let mut fx = Fixture::with_stock(1);
    fx.store.add_product(ProductId::new(2)).await;
    let before = persisted(&fx);

    fx.store.add_product(ProductId::new(2)).await;
    fx.store.remove_product(ProductId::new(9));
    fx.store.update_product_amount(update(2, 0)).await;
    fx.catalog.set_offline(true);
    fx.store.add_product(ProductId::new(4)).await;

    assert_eq!(persisted(&fx), before);
    assert_eq!(fx.notifier.messages().len(), 4);
}

// =============================================================================
// Subscription
// =============================================================================

#[tokio::test]
async fn test_subscriber_follows_commits_only() {
    let mut fx = Fixture::with_stock(2);
    let mut subscription = fx.store.subscribe();

    fx.store.add_product(ProductId::new(1)).await;
    assert_eq!(subscription.changed().await.expect("store alive"), vec![line(1, 1)]);

    fx.store.update_product_amount(update(1, 9)).await;
    fx.store.update_product_amount(update(1, 2)).await;
    assert_eq!(subscription.changed().await.expect("store alive"), vec![line(1, 2)]);

    drop(fx.store);
    assert!(matches!(subscription.snapshot(), Err(CartError::Detached)));
}
