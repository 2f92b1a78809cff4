//! Cart error taxonomy.
//!
//! Every failure of a cart operation is a [`CartError`]. The store never
//! lets one escape its notifying operations: each error is turned into the
//! user-facing string returned by [`CartError::user_message`] and handed to
//! the notification sink, and the cart keeps its last valid state.

use thiserror::Error;

use rocket_shoes_core::ProductId;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// The cart operation an error happened in.
///
/// Lookup and storage failures carry one so the notification can say which
/// action failed without leaking transport details to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic user-facing failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::UpdateAmount => "Error changing product quantity",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::UpdateAmount => "update amount",
        };
        f.write_str(name)
    }
}

/// Errors produced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the cart.
    #[error("{op}: product {product_id} is not in the cart")]
    NotFoundInCart { op: Operation, product_id: ProductId },

    /// Requested amount was zero or negative.
    #[error("invalid amount {amount}, must be at least 1")]
    InvalidAmount { amount: i64 },

    /// Requested amount exceeds remote stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Catalog lookup failed (network, status, or body).
    #[error("{op}: catalog lookup failed: {source}")]
    Lookup {
        op: Operation,
        #[source]
        source: CatalogError,
    },

    /// Writing the cart snapshot failed.
    #[error("{op}: could not persist cart: {source}")]
    Storage {
        op: Operation,
        #[source]
        source: StorageError,
    },

    /// Encoding the cart snapshot failed.
    #[error("{op}: could not serialize cart: {source}")]
    Serialize {
        op: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The cart was read through a subscription whose store no longer exists.
    #[error("cart store has been dropped")]
    Detached,
}

impl CartError {
    /// Message shown to the shopper for this error.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "Invalid product amount",
            Self::OutOfStock { .. } => "Requested quantity out of stock",
            Self::NotFoundInCart { op, .. }
            | Self::Lookup { op, .. }
            | Self::Storage { op, .. }
            | Self::Serialize { op, .. } => op.failure_message(),
            Self::Detached => "Cart is unavailable",
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
