//! Cart aggregation engine.
//!
//! The cart is an ordered list of line items keyed by `(product, size,
//! color)`. Adding the same key again merges quantities; a different size
//! or color of the same product is its own line. Line items snapshot the
//! product's name, unit price and image at add time, so later catalog
//! edits never reprice a cart already in progress.

pub mod store;

pub use store::{CartStore, StoreError, CART_SLOT};

use rivaaj_core::{Price, ProductId, ProductRecord};
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel the legacy cart format used for "no size/color chosen".
const LEGACY_NONE: &str = "N/A";

/// Optional size and color selection for a line item.
///
/// Serialized inline into the line item; absent selections are omitted.
/// The legacy `"N/A"` sentinel is accepted on read and mapped to `None`,
/// never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantChoice {
    #[serde(
        default,
        rename = "selectedSize",
        deserialize_with = "de_variant_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<String>,
    #[serde(
        default,
        rename = "selectedColor",
        deserialize_with = "de_variant_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

impl VariantChoice {
    #[must_use]
    pub const fn new(size: Option<String>, color: Option<String>) -> Self {
        Self { size, color }
    }

    /// No size, no color.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(None, None)
    }
}

fn de_variant_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != LEGACY_NONE))
}

/// Identity of a cart line: product plus chosen variant.
///
/// Two additions with equal keys land on the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub variant: VariantChoice,
}

impl LineKey {
    #[must_use]
    pub const fn new(product_id: ProductId, variant: VariantChoice) -> Self {
        Self {
            product_id,
            variant,
        }
    }
}

/// One line of the cart.
///
/// The serialized form is the persisted cart format. Field aliases accept
/// the legacy layout (`id`, `price`, `image`) so carts written by older
/// releases keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: Price,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(flatten)]
    pub variant: VariantChoice,
    pub quantity: u32,
}

impl CartLineItem {
    /// Merge key for this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.variant.clone())
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// In-memory cart state for one browsing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from stored line items, preserving their order.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    /// Add `quantity` of a product with the given variant selection.
    ///
    /// A quantity of zero is treated as one. If a line with the same
    /// `(product, size, color)` key exists its quantity grows; otherwise a
    /// new line is appended, snapshotting the product's current name,
    /// price and first image.
    pub fn add(&mut self, product: &ProductRecord, quantity: u32, variant: VariantChoice) {
        let quantity = quantity.max(1);
        let key = LineKey::new(product.id, variant.clone());
        if let Some(line) = self.items.iter_mut().find(|line| line.key() == key) {
            line.quantity += quantity;
        } else {
            self.items.push(CartLineItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                image_ref: product.first_image().map(ToOwned::to_owned),
                variant,
                quantity,
            });
        }
    }

    /// Remove the line with this key. Absent keys are a no-op.
    pub fn remove(&mut self, key: &LineKey) {
        self.items.retain(|line| line.key() != *key);
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// Zero or negative removes the line. Absent keys are a no-op.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i32) {
        let Ok(quantity @ 1..) = u32::try_from(quantity) else {
            self.remove(key);
            return;
        };
        if let Some(line) = self.items.iter_mut().find(|line| line.key() == *key) {
            line.quantity = quantity;
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals. Independent of line order.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
