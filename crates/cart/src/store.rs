//! The cart store.
//!
//! [`CartStore`] owns the cart and is the only thing that changes it. Each
//! mutation builds the next cart as a copy, writes that copy to the key-value
//! store, and only then replaces the in-memory cart and publishes it to
//! subscribers. A failed validation, lookup, or write therefore leaves both
//! the persisted and the visible cart exactly as they were.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_shoes_cart::{CartStore, MemoryCatalog, MemoryStore, TracingNotifier};
//!
//! let mut store = CartStore::new(catalog, MemoryStore::new(), TracingNotifier);
//! store.add_product(ProductId::new(1)).await;
//! store
//!     .update_product_amount(UpdateProductAmount { product_id: ProductId::new(1), amount: 3 })
//!     .await;
//! ```

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use rocket_shoes_core::{CurrencyCode, Price, Product, ProductId};

use crate::catalog::CatalogService;
use crate::error::{CartError, Operation, Result};
use crate::notify::{NotificationSink, Severity};
use crate::storage::KeyValueStore;
use crate::summary::CartSummary;

/// Storage key the cart snapshot is kept under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a product's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity. Zero or negative values are rejected.
    pub amount: i64,
}

/// Shopping cart state container.
///
/// Generic over its three collaborators so each can be swapped for an
/// in-memory double. Mutating operations take `&mut self`: one owner, one
/// operation at a time.
pub struct CartStore<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    key: String,
    cart: Vec<Product>,
    published: watch::Sender<Vec<Product>>,
}

impl<C, S, N> std::fmt::Debug for CartStore<C, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl<C, S, N> CartStore<C, S, N>
where
    C: CatalogService,
    S: KeyValueStore,
    N: NotificationSink,
{
    /// Create a store, loading the cart saved under [`DEFAULT_STORAGE_KEY`].
    pub fn new(catalog: C, storage: S, notifier: N) -> Self {
        Self::with_key(catalog, storage, notifier, DEFAULT_STORAGE_KEY)
    }

    /// Create a store, loading the cart saved under `key`.
    ///
    /// A missing or unreadable snapshot starts an empty cart.
    pub fn with_key(catalog: C, storage: S, notifier: N, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_cart(&storage, &key);
        let (published, _) = watch::channel(cart.clone());

        Self {
            catalog,
            storage,
            notifier,
            key,
            cart,
            published,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[Product] {
        &self.cart
    }

    /// Cart line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.cart.iter().find(|p| p.id == id)
    }

    /// Whether `id` is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.iter().map(Product::line_total).sum()
    }

    /// Display snapshot of the cart.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        CartSummary::new(&self.cart, currency)
    }

    /// Watch committed carts.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            rx: self.published.subscribe(),
        }
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Notifying operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Failures are reported through the notification sink.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) {
        let result = self.try_add_product(product_id).await;
        self.report(result);
    }

    /// Remove a product line.
    ///
    /// Failures are reported through the notification sink.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) {
        let result = self.try_remove_product(product_id);
        self.report(result);
    }

    /// Set a product's quantity.
    ///
    /// Failures are reported through the notification sink.
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) {
        let result = self.try_update_product_amount(request).await;
        self.report(result);
    }

    // =========================================================================
    // Fallible operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`try_update_product_amount`](Self::try_update_product_amount) with its
    /// amount plus one, so the stock limit applies. A new product is fetched
    /// from the catalog and appended with amount 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Lookup` if the catalog lookup fails, any error of
    /// `try_update_product_amount` for a product already in the cart, and
    /// `CartError::Storage` if the snapshot cannot be written.
    pub async fn try_add_product(&mut self, product_id: ProductId) -> Result<()> {
        if let Some(existing) = self.get(product_id) {
            let request = UpdateProductAmount {
                product_id,
                amount: i64::from(existing.amount) + 1,
            };
            return self.try_update_product_amount(request).await;
        }

        let product = self
            .catalog
            .product(product_id)
            .await
            .map_err(|source| CartError::Lookup {
                op: Operation::Add,
                source,
            })?;

        let mut next = self.cart.clone();
        next.push(product.into_cart_product());
        self.commit(Operation::Add, next)
    }

    /// Remove a product line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFoundInCart` if the product is not in the cart
    /// and `CartError::Storage` if the snapshot cannot be written.
    pub fn try_remove_product(&mut self, product_id: ProductId) -> Result<()> {
        if !self.contains(product_id) {
            return Err(CartError::NotFoundInCart {
                op: Operation::Remove,
                product_id,
            });
        }

        let next = self
            .cart
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();
        self.commit(Operation::Remove, next)
    }

    /// Set a product's quantity after checking it against remote stock.
    ///
    /// Checks run in order: amount is positive, stock lookup succeeds, amount
    /// fits in stock, product is in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidAmount`, `CartError::Lookup`,
    /// `CartError::OutOfStock`, `CartError::NotFoundInCart`, or
    /// `CartError::Storage`.
    pub async fn try_update_product_amount(&mut self, request: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = request;

        if amount <= 0 {
            return Err(CartError::InvalidAmount { amount });
        }

        let stock = self
            .catalog
            .stock(product_id)
            .await
            .map_err(|source| CartError::Lookup {
                op: Operation::UpdateAmount,
                source,
            })?;

        let requested = u32::try_from(amount)
            .ok()
            .filter(|&requested| requested <= stock.amount)
            .ok_or(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            })?;

        let mut next = self.cart.clone();
        let line = next
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CartError::NotFoundInCart {
                op: Operation::UpdateAmount,
                product_id,
            })?;
        line.amount = requested;

        self.commit(Operation::UpdateAmount, next)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, op: Operation, next: Vec<Product>) -> Result<()> {
        let json = serde_json::to_string(&next).map_err(|source| CartError::Serialize { op, source })?;

        self.storage
            .set(&self.key, &json)
            .map_err(|source| CartError::Storage { op, source })?;

        self.cart = next;
        self.published.send_replace(self.cart.clone());

        debug!(
            op = %op,
            lines = self.cart.len(),
            items = self.item_count(),
            "Cart committed"
        );
        Ok(())
    }

    fn report(&self, result: Result<()>) {
        if let Err(err) = result {
            debug!(error = %err, "Cart operation failed");
            self.notifier.display(err.user_message(), Severity::Error);
        }
    }
}

/// Load the persisted cart, falling back to an empty one.
///
/// Each stored line is decoded on its own. Lines that fail to decode or break
/// the cart invariants (zero amount, repeated ID) are dropped; the rest are kept.
fn load_cart<S: KeyValueStore>(storage: &S, key: &str) -> Vec<Product> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, key, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    let stored: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(error = %e, key, "Stored cart is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let total = stored.len();
    let mut seen = HashSet::new();
    let cart: Vec<Product> = stored
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Product>(value) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(error = %e, key, "Skipping undecodable stored cart line");
                None
            }
        })
        .filter(|p| p.amount >= 1 && seen.insert(p.id))
        .collect();

    if cart.len() != total {
        warn!(
            key,
            dropped = total - cart.len(),
            "Dropped invalid lines from stored cart"
        );
    }

    cart
}

/// Read-only view of the cart that follows every committed change.
///
/// Reads fail with `CartError::Detached` once the store that handed out the
/// subscription has been dropped.
#[derive(Debug, Clone)]
pub struct CartSubscription {
    rx: watch::Receiver<Vec<Product>>,
}

impl CartSubscription {
    /// The most recently committed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Detached` if the store has been dropped.
    pub fn snapshot(&self) -> Result<Vec<Product>> {
        if self.rx.has_changed().is_err() {
            return Err(CartError::Detached);
        }
        Ok(self.rx.borrow().clone())
    }

    /// Wait for the next committed cart and return it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Detached` if the store is dropped while waiting.
    pub async fn changed(&mut self) -> Result<Vec<Product>> {
        self.rx.changed().await.map_err(|_| CartError::Detached)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
