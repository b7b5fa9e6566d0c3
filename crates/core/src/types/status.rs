//! Payment method and order status types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
///
/// These are informational labels only; there is no settlement logic
/// behind either of them. The serialized tokens are the canonical wire
/// values stored on order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Pay the courier in cash at the door. Carries the COD surcharge.
    CashOnDelivery,
    /// Transfer to the store's wallet account before dispatch.
    DigitalWalletTransfer,
}

impl PaymentMethod {
    /// Human-readable label for checkout screens and confirmation emails.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::DigitalWalletTransfer => "Digital Wallet Transfer",
        }
    }

    /// Whether this method carries the COD surcharge.
    #[must_use]
    pub const fn is_cash_on_delivery(&self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-text order status.
///
/// Order status is mutated by direct administrative writes with no
/// state-machine enforcement, so this is a string newtype rather than a
/// closed enum. [`OrderStatus::KNOWN`] lists the labels the admin console
/// offers; anything else is still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    /// Status labels the admin console offers in its dropdown.
    pub const KNOWN: &'static [&'static str] =
        &["Pending", "Confirmed", "Shipped", "Delivered", "Cancelled"];

    /// Create a status from arbitrary text.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The initial status assigned to every submitted order.
    #[must_use]
    pub fn pending() -> Self {
        Self("Pending".to_owned())
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this status is one of the labels the admin console offers.
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}
