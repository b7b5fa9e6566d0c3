//! Admin client for the hosted backend.
//!
//! Write-side counterpart to the storefront's read paths: order status
//! updates, catalog inserts and deletes, and image upload/delete against
//! the backend's object storage. Every operation is a single request;
//! rejected writes surface the backend's own message verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use rivaaj_core::{
    CategoryId, CategoryRecord, GatewayError, OrderId, OrderStatus, Price, ProductId,
    ProductRecord,
};

use crate::config::BackendConfig;

/// Per-request deadline for every backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage bucket holding product and category imagery.
const IMAGE_BUCKET: &str = "product-images";

/// A product as entered in the admin form, ready to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    /// Pre-discount price, shown struck through when higher than `price`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub category: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// A category as entered in the admin form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// An image file picked in the admin form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name; only its extension survives into storage.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Backend write seam for the admin console.
///
/// [`AdminClient`] is the production implementation; tests drop in
/// recording fakes.
#[async_trait]
pub trait AdminGateway {
    /// Overwrite the status of one order.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] with the backend's own message when
    /// the update is rejected, [`GatewayError::Unavailable`] when the
    /// backend cannot be reached.
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<(), GatewayError>;

    /// Insert a product, returning the stored record.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] when the backend rejects the row.
    async fn insert_product(&self, product: &NewProduct) -> Result<ProductRecord, GatewayError>;

    /// Delete a product. Deleting an id that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unavailable`] when the backend cannot be reached.
    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError>;

    /// Insert a category, returning the stored record.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] when the backend rejects the row.
    async fn insert_category(&self, category: &NewCategory)
        -> Result<CategoryRecord, GatewayError>;

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unavailable`] when the backend cannot be reached.
    async fn delete_category(&self, id: CategoryId) -> Result<(), GatewayError>;

    /// Upload an image to storage, returning its public URL.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] when storage refuses the object,
    /// [`GatewayError::Unavailable`] when the backend cannot be reached.
    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError>;

    /// Delete a previously uploaded image by its public URL.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] when the URL does not point into
    /// managed storage or the backend rejects the delete.
    async fn delete_image(&self, public_url: &str) -> Result<(), GatewayError>;
}

/// Write client for the hosted backend's tables and object storage.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    endpoint: Option<Endpoint>,
}

#[derive(Clone)]
struct Endpoint {
    base: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base", &self.base.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
}

impl AdminClient {
    #[must_use]
    pub fn from_config(backend: Option<&BackendConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: backend.map(|cfg| Endpoint {
                base: cfg.base_url.clone(),
                api_key: cfg.api_key.clone(),
            }),
        }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn endpoint(&self) -> Result<&Endpoint, GatewayError> {
        self.endpoint.as_ref().ok_or_else(GatewayError::not_configured)
    }

    fn url(endpoint: &Endpoint, path: &str) -> String {
        format!("{}/{}", endpoint.base.as_str().trim_end_matches('/'), path)
    }

    /// Issue a write and check only its status.
    async fn write(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<(), GatewayError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.map_err(transport_error)?;
        tracing::error!(%status, context, body = %snippet(&text), "backend write rejected");
        Err(write_rejection(status, &text))
    }

    /// Issue an insert with `return=representation` and decode the row.
    async fn insert_returning<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let endpoint = self.endpoint()?;
        let response = self
            .http
            .post(Self::url(endpoint, path))
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::error!(%status, path, body = %snippet(&text), "backend insert rejected");
            return Err(write_rejection(status, &text));
        }
        let rows: Vec<T> = serde_json::from_str(&text)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::remote_write("insert returned no record"))
    }

    /// Turn a public image URL back into its bucket-relative object path.
    fn object_path(&self, public_url: &str) -> Option<String> {
        let endpoint = self.endpoint.as_ref()?;
        let prefix = Self::url(endpoint, "storage/v1/object/public/");
        public_url
            .strip_prefix(&prefix)
            .filter(|path| !path.is_empty())
            .map(ToOwned::to_owned)
    }
}

#[async_trait]
impl AdminGateway for AdminClient {
    #[instrument(skip(self))]
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<(), GatewayError> {
        let endpoint = self.endpoint()?;
        let request = self
            .http
            .patch(Self::url(endpoint, "rest/v1/orders"))
            .timeout(REQUEST_TIMEOUT)
            .query(&[("id", format!("eq.{order_id}"))])
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret())
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "status": status }));
        self.write(request, "update order status").await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn insert_product(&self, product: &NewProduct) -> Result<ProductRecord, GatewayError> {
        self.insert_returning("rest/v1/products", product).await
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        let endpoint = self.endpoint()?;
        let request = self
            .http
            .delete(Self::url(endpoint, "rest/v1/products"))
            .timeout(REQUEST_TIMEOUT)
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret());
        self.write(request, "delete product").await
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn insert_category(
        &self,
        category: &NewCategory,
    ) -> Result<CategoryRecord, GatewayError> {
        self.insert_returning("rest/v1/categories", category).await
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: CategoryId) -> Result<(), GatewayError> {
        let endpoint = self.endpoint()?;
        let request = self
            .http
            .delete(Self::url(endpoint, "rest/v1/categories"))
            .timeout(REQUEST_TIMEOUT)
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret());
        self.write(request, "delete category").await
    }

    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError> {
        let endpoint = self.endpoint()?;
        let object = object_name(&upload.file_name);
        let request = self
            .http
            .post(Self::url(
                endpoint,
                &format!("storage/v1/object/{IMAGE_BUCKET}/{object}"),
            ))
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret())
            .header("Content-Type", upload.content_type.clone())
            .body(upload.bytes.clone());
        self.write(request, "upload image").await?;
        Ok(Self::url(
            endpoint,
            &format!("storage/v1/object/public/{IMAGE_BUCKET}/{object}"),
        ))
    }

    #[instrument(skip(self))]
    async fn delete_image(&self, public_url: &str) -> Result<(), GatewayError> {
        let endpoint = self.endpoint()?;
        let Some(path) = self.object_path(public_url) else {
            return Err(GatewayError::remote_write(format!(
                "not a managed image URL: {public_url}"
            )));
        };
        let request = self
            .http
            .delete(Self::url(endpoint, &format!("storage/v1/object/{path}")))
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret());
        self.write(request, "delete image").await
    }
}

/// Storage object name: random prefix plus a sanitized file name, under
/// a products/ folder. The prefix keeps re-uploads of the same file from
/// colliding.
fn object_name(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("products/{}-{safe}", Uuid::new_v4())
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::unavailable("request timed out")
    } else {
        GatewayError::unavailable(err.to_string())
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(500).collect()
}

fn write_rejection(status: StatusCode, text: &str) -> GatewayError {
    let message = serde_json::from_str::<RejectionBody>(text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            let body = snippet(text);
            if body.trim().is_empty() {
                format!("backend answered {status}")
            } else {
                body
            }
        });
    GatewayError::remote_write(message)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn configured() -> AdminClient {
        let config = BackendConfig {
            base_url: Url::parse("https://shop.example.com").unwrap(),
            api_key: SecretString::from("sb-service-2b1a0f9e8d7c6b5a4938"),
        };
        AdminClient::from_config(Some(&config))
    }

    #[tokio::test]
    async fn test_unconfigured_status_update_reports_unavailable() {
        let client = AdminClient::from_config(None);
        let err = client
            .update_order_status(OrderId::new(1), &OrderStatus::from("Shipped"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_unconfigured_upload_reports_unavailable() {
        let client = AdminClient::from_config(None);
        let upload = ImageUpload {
            file_name: "kurta.jpg".to_owned(),
            content_type: "image/jpeg".to_owned(),
            bytes: vec![0xFF, 0xD8],
        };
        assert!(client.upload_image(&upload).await.unwrap_err().is_unavailable());
    }

    #[test]
    fn test_object_name_sanitizes_and_uniquifies() {
        let first = object_name("my photo (1).jpg");
        let second = object_name("my photo (1).jpg");

        assert!(first.starts_with("products/"));
        assert!(first.ends_with("-my-photo--1-.jpg"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_object_path_strips_the_public_prefix() {
        let client = configured();
        let path = client
            .object_path("https://shop.example.com/storage/v1/object/public/product-images/products/abc.jpg")
            .unwrap();
        assert_eq!(path, "product-images/products/abc.jpg");
    }

    #[test]
    fn test_object_path_rejects_foreign_urls() {
        let client = configured();
        assert!(client.object_path("https://elsewhere.example.com/cat.jpg").is_none());
    }

    #[test]
    fn test_new_product_wire_shape() {
        let product = NewProduct {
            name: "Chiffon Dupatta".to_owned(),
            description: None,
            price: Price::new(1800),
            original_price: Some(Price::new(2200)),
            category: "Accessories".to_owned(),
            sizes: Vec::new(),
            colors: vec!["Teal".to_owned()],
            image_urls: vec!["https://cdn.example.com/dupatta.jpg".to_owned()],
            stock: Some(25),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value.get("originalPrice"), Some(&json!(2200)));
        assert_eq!(value.get("imageUrls"), Some(&json!(["https://cdn.example.com/dupatta.jpg"])));
        assert!(value.get("description").is_none());
        assert!(value.get("sizes").is_none());
    }

    #[test]
    fn test_write_rejection_uses_backend_message() {
        let err = write_rejection(
            StatusCode::CONFLICT,
            r#"{"message": "duplicate key value violates unique constraint"}"#,
        );
        assert_eq!(err.to_string(), "duplicate key value violates unique constraint");
    }
}
