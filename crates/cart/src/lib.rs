//! Rocket Shoes Cart - shopping cart store.
//!
//! Holds the shopper's cart, persists it to a key-value surface, and checks
//! quantity changes against a remote stock service.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart and exposes add, remove and update-amount
//! - [`CatalogService`] answers product and stock lookups ([`HttpCatalogClient`]
//!   for the REST catalog, [`MemoryCatalog`] in memory)
//! - [`KeyValueStore`] persists the cart snapshot ([`FileStore`], [`MemoryStore`])
//! - [`NotificationSink`] shows failures to the user ([`TracingNotifier`],
//!   [`MemoryNotifier`])
//!
//! All three collaborators are injected at construction, so the store can be
//! driven entirely in memory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;
pub mod summary;

pub use catalog::{CatalogError, CatalogService, HttpCatalogClient, MemoryCatalog};
pub use config::{CartConfig, CatalogConfig, ConfigError};
pub use error::{CartError, Operation};
pub use notify::{MemoryNotifier, Notification, NotificationSink, Severity, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, CartSubscription, DEFAULT_STORAGE_KEY, UpdateProductAmount};
pub use summary::{CartLineView, CartSummary};
