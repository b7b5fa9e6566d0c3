//! Rivaaj storefront engine.
//!
//! The customer-facing half of the shop as a library. The embedding UI
//! (web, native, whatever) owns routing and rendering; this crate owns the
//! cart, checkout totals, the sign-in gate, and the clients that talk to
//! the hosted backend.
//!
//! # Architecture
//!
//! Each browsing session drives one [`session::StorefrontSession`]. Cart
//! mutations flow gate → engine → store mirror: the identity gate rejects
//! the action outright when nobody is signed in, the in-memory [`cart::Cart`]
//! applies it, and the [`cart::CartStore`] writes the result through to disk
//! so the cart survives restarts. Checkout validates shipping details,
//! prices the order with [`checkout::checkout_totals`], submits through a
//! [`backend::OrderGateway`], and clears the cart only after the backend
//! confirms the insert.
//!
//! The backend connection is optional. Without `RIVAAJ_BACKEND_URL` and
//! `RIVAAJ_BACKEND_KEY` the engine still runs; every remote call reports a
//! clearly signaled unavailable error instead of crashing.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;

pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use session::StorefrontSession;
