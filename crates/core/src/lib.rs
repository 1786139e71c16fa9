//! Scoop Shop Core - Shared types library.
//!
//! This crate provides the domain types shared across Scoop Shop components:
//! the product catalog entries, the single-line-item cart, and the order
//! record that flows through the interchangeable order backends.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. Everything here is constructible and testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Products, cart items, orders, statuses, and type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
