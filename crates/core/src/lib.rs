//! Rocket Shoes Core - Shared types library.
//!
//! This crate provides the domain types used across the Rocket Shoes cart:
//! - `cart` - The cart store and the ports it talks to
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, and the product records stored in a cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
