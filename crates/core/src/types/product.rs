//! Canonical catalog record shapes.
//!
//! The backend's product rows have gone through several historical shapes
//! for the image field (`image` as a single string, `imageUrl` as a single
//! string, `imageUrls` as an array). The canonical schema is `imageUrls`;
//! deserialization folds the older shapes into it so callers never see the
//! divergence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

/// A catalog product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current selling price, whole rupees.
    pub price: Price,
    /// Pre-discount price, when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Category name; the exact-match key used by catalog filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    /// Canonical image list. Always serialized under this name.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Informational stock count. Never decremented by checkout; admins
    /// edit it manually.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// The image snapshotted onto cart line items.
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Wire shape accepting all historical image-field variants.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Price,
    #[serde(default)]
    original_price: Option<Price>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default)]
    image_urls: Option<Vec<String>>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    stock: Option<u32>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for ProductRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawProductRecord::deserialize(deserializer)?;

        // The array form wins when present; otherwise promote whichever
        // single-image field the row carries.
        let image_urls = match raw.image_urls {
            Some(urls) if !urls.is_empty() => urls,
            _ => raw.image_url.or(raw.image).into_iter().collect(),
        };

        Ok(Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            price: raw.price,
            original_price: raw.original_price,
            category: raw.category,
            sizes: raw.sizes,
            colors: raw.colors,
            image_urls,
            stock: raw.stock,
            created_at: raw.created_at,
        })
    }
}

/// A catalog category as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
