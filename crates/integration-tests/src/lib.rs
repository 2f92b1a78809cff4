//! Integration tests for the Rocket Shoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Store behaviour against in-memory collaborators
//! - `http_catalog` - Store driven through the REST catalog client and file storage
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rocket_shoes_cart::{CartStore, MemoryCatalog, MemoryNotifier, MemoryStore};
use rocket_shoes_core::{CatalogProduct, Price, Product, ProductId};

/// Store wired to in-memory collaborators.
pub type MemoryCartStore = CartStore<MemoryCatalog, MemoryStore, MemoryNotifier>;

/// The demo catalog: `(id, name, price in cents)`.
pub const SNEAKERS: &[(i64, &str, i64)] = &[
    (1, "Tênis de Caminhada Leve Confortável", 17990),
    (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990),
    (3, "Tênis Adidas Duramo Lite 2.0", 21990),
    (4, "Tênis de Caminhada Leve Confortável", 17990),
    (5, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990),
    (6, "Tênis Adidas Duramo Lite 2.0", 21990),
];

/// Catalog record for a demo product.
///
/// Unknown IDs get a generic name and price.
#[must_use]
pub fn sneaker(id: i64) -> CatalogProduct {
    let (name, cents) = SNEAKERS
        .iter()
        .find(|(sid, _, _)| *sid == id)
        .map_or(("Tênis", 9990), |&(_, name, cents)| (name, cents));

    CatalogProduct {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        image_url: format!(
            "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"
        ),
    }
}

/// Cart line for a demo product with the given amount.
#[must_use]
pub fn line(id: i64, amount: u32) -> Product {
    Product {
        amount,
        ..sneaker(id).into_cart_product()
    }
}

/// JSON body the REST catalog returns for a demo product.
#[must_use]
pub fn product_json(id: i64) -> String {
    let product = sneaker(id);
    serde_json::json!({
        "id": id,
        "title": product.name,
        "price": product.price,
        "image": product.image_url,
        "imageUrl": product.image_url,
    })
    .to_string()
}

/// JSON body the REST catalog returns for a stock lookup.
#[must_use]
pub fn stock_json(id: i64, amount: u32) -> String {
    serde_json::json!({ "id": id, "amount": amount }).to_string()
}

/// In-memory store plus handles to its collaborators.
pub struct Fixture {
    pub store: MemoryCartStore,
    pub catalog: MemoryCatalog,
    pub storage: MemoryStore,
    pub notifier: MemoryNotifier,
}

impl Fixture {
    /// Demo catalog where every product has `stock` units.
    #[must_use]
    pub fn with_stock(stock: u32) -> Self {
        let catalog = MemoryCatalog::new();
        for &(id, _, _) in SNEAKERS {
            catalog.insert(sneaker(id), stock);
        }
        let storage = MemoryStore::new();
        let notifier = MemoryNotifier::new();
        let store = CartStore::new(catalog.clone(), storage.clone(), notifier.clone());

        Self {
            store,
            catalog,
            storage,
            notifier,
        }
    }

    /// Reopen a store on the same storage, as a page reload would.
    #[must_use]
    pub fn reload(&self) -> MemoryCartStore {
        CartStore::new(
            self.catalog.clone(),
            self.storage.clone(),
            self.notifier.clone(),
        )
    }
}
