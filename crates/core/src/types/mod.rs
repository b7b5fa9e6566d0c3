//! Core types for Rivaaj.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use product::{CategoryRecord, ProductRecord};
pub use status::{OrderStatus, PaymentMethod};
