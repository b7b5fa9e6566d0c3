//! Rivaaj Core - Shared types library.
//!
//! This crate provides common types used across all Rivaaj components:
//! - `storefront` - Customer-facing cart/checkout engine
//! - `admin` - Administrative console services
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phone
//!   numbers, statuses, and the canonical catalog record shapes
//! - [`error`] - The shared gateway error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod types;

pub use error::GatewayError;
pub use types::*;
