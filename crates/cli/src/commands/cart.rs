//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//!
//! # Add one unit of product 1
//! rs-cart add 1
//!
//! # Set product 1 to three units
//! rs-cart update 1 3
//!
//! # Remove product 1
//! rs-cart remove 1
//! ```
//!
//! Failures are reported the same way a storefront would show a toast: as a
//! notification, here emitted through `tracing`. The command itself still
//! succeeds and prints the resulting cart.

use thiserror::Error;
use tracing::info;

use rocket_shoes_cart::{
    CartConfig, CartStore, CartSummary, CatalogError, CatalogService, FileStore, HttpCatalogClient,
    KeyValueStore, NotificationSink, StorageError, TracingNotifier, UpdateProductAmount,
};
use rocket_shoes_core::ProductId;

/// Errors that prevent a cart command from running at all.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog client could not be built.
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A single cart action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartCommand {
    Show,
    Add(ProductId),
    Remove(ProductId),
    Update { product_id: ProductId, amount: i64 },
}

/// Open the configured catalog and storage, run `command`, and summarize the cart.
///
/// # Errors
///
/// Returns `CommandError` if the catalog client or storage directory cannot
/// be set up. Failures of the cart action itself are notified, not returned.
pub async fn run(config: &CartConfig, command: CartCommand) -> Result<CartSummary, CommandError> {
    let catalog = HttpCatalogClient::new(&config.catalog)?;
    let storage = FileStore::open(&config.storage_dir)?;
    info!(
        storage_dir = %storage.dir().display(),
        catalog = %config.catalog.base_url,
        "Opened cart"
    );

    let mut store = CartStore::with_key(
        catalog,
        storage,
        TracingNotifier,
        config.storage_key.clone(),
    );
    execute(&mut store, command).await;

    Ok(store.summary(config.currency))
}

/// Apply `command` to `store`.
pub async fn execute<C, S, N>(store: &mut CartStore<C, S, N>, command: CartCommand)
where
    C: CatalogService,
    S: KeyValueStore,
    N: NotificationSink,
{
    match command {
        CartCommand::Show => {}
        CartCommand::Add(product_id) => store.add_product(product_id).await,
        CartCommand::Remove(product_id) => store.remove_product(product_id),
        CartCommand::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }
    }
}
