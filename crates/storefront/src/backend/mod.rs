//! Remote catalog and order gateway.
//!
//! A thin request/response layer over the hosted backend's REST dialect.
//! No caching, no retries, no pagination cursors: every screen issues a
//! fresh fetch when it mounts, and order submission is a single POST.
//! With no backend configured every call reports
//! [`GatewayError::Unavailable`] instead of touching the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use rivaaj_core::{CategoryRecord, GatewayError, OrderId, ProductId, ProductRecord};

use crate::checkout::OrderPayload;
use crate::config::BackendConfig;

/// Per-request deadline for every backend call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Join a path onto the configured base URL.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

/// First 500 chars of a response body, for log lines.
pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(500).collect()
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Newest insertions first. The storefront default.
    #[default]
    NewestFirst,
    OldestFirst,
}

impl ProductOrder {
    const fn query_value(self) -> &'static str {
        match self {
            Self::NewestFirst => "id.desc",
            Self::OldestFirst => "id.asc",
        }
    }
}

/// Filters for [`CatalogClient::list_products`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Exact category name to filter on.
    pub category: Option<String>,
    /// Cap on the number of rows returned.
    pub limit: Option<u32>,
    pub order: ProductOrder,
}

impl ProductQuery {
    /// The landing page query: newest `limit` products across categories.
    #[must_use]
    pub fn featured(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Everything in one category, newest first.
    #[must_use]
    pub fn in_category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("select".to_owned(), "*".to_owned()),
            ("order".to_owned(), self.order.query_value().to_owned()),
        ];
        if let Some(category) = &self.category {
            pairs.push(("category".to_owned(), format!("eq.{category}")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        pairs
    }
}

/// Order submission seam between the session and the backend.
///
/// [`CatalogClient`] is the production implementation; tests drop in
/// recording fakes.
#[async_trait]
pub trait OrderGateway {
    /// Submit an assembled order, returning its backend-assigned id.
    ///
    /// # Errors
    ///
    /// [`GatewayError::RemoteWrite`] with the backend's own message when
    /// the insert is rejected, [`GatewayError::Unavailable`] when the
    /// backend cannot be reached at all.
    async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderId, GatewayError>;
}

/// Read/write client for the hosted catalog and order tables.
#[derive(Debug, Clone)]
pub struct CatalogClient {
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

/// Representation row returned by an order insert.
#[derive(Debug, Deserialize)]
struct InsertedOrder {
    id: OrderId,
}

/// Shape of a backend rejection body.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
}

impl CatalogClient {
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

    /// All products matching the query, already filtered and sorted by
    /// the backend.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unavailable`] when the backend is unconfigured or
    /// unreachable, [`GatewayError::Parse`] for an undecodable body.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<ProductRecord>, GatewayError> {
        self.get_rows("rest/v1/products", &query.query_pairs()).await
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotFound`] when the id matches nothing.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductRecord, GatewayError> {
        let pairs = vec![
            ("select".to_owned(), "*".to_owned()),
            ("id".to_owned(), format!("eq.{id}")),
        ];
        let rows: Vec<ProductRecord> = self.get_rows("rest/v1/products", &pairs).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(format!("product {id}")))
    }

    /// Every category, sorted by name.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unavailable`] when the backend is unconfigured or
    /// unreachable, [`GatewayError::Parse`] for an undecodable body.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, GatewayError> {
        let pairs = vec![
            ("select".to_owned(), "*".to_owned()),
            ("order".to_owned(), "name.asc".to_owned()),
        ];
        self.get_rows("rest/v1/categories", &pairs).await
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, GatewayError> {
        let endpoint = self.endpoint()?;
        let url = endpoint_url(&endpoint.base, path);
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(query)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::error!(%status, path, body = %snippet(&text), "backend read failed");
            return Err(GatewayError::unavailable(format!("backend answered {status}")));
        }
        serde_json::from_str(&text).map_err(|err| {
            tracing::error!(error = %err, path, body = %snippet(&text), "backend rows failed to decode");
            GatewayError::Parse(err)
        })
    }
}

#[async_trait]
impl OrderGateway for CatalogClient {
    #[instrument(skip(self, payload), fields(total = %payload.total_price))]
    async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderId, GatewayError> {
        let endpoint = self.endpoint()?;
        let url = endpoint_url(&endpoint.base, "rest/v1/orders");
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("apikey", endpoint.api_key.expose_secret())
            .bearer_auth(endpoint.api_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::error!(%status, body = %snippet(&text), "order insert rejected");
            return Err(write_rejection(status, &text));
        }
        let rows: Vec<InsertedOrder> = serde_json::from_str(&text)?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| GatewayError::remote_write("order insert returned no record"))
    }
}

/// Map a transport failure to the unavailable state.
fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::unavailable("request timed out")
    } else {
        GatewayError::unavailable(err.to_string())
    }
}

/// Map a rejected write to [`GatewayError::RemoteWrite`], passing the
/// backend's own message through verbatim when it provides one.
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
    use crate::checkout::ShippingInfo;
    use rivaaj_core::{OrderStatus, PaymentMethod, Price};

    fn order_payload() -> OrderPayload {
        OrderPayload {
            customer_details: ShippingInfo {
                full_name: "Ayesha Khan".to_owned(),
                email: "ayesha@example.com".to_owned(),
                phone: "0300-1234567".to_owned(),
                address: "House 12, Street 4".to_owned(),
                city: "Lahore".to_owned(),
                postal_code: String::new(),
            },
            order_items: Vec::new(),
            total_price: Price::new(9349),
            status: OrderStatus::pending(),
            payment_method: PaymentMethod::CashOnDelivery,
            shipping_fee: Price::new(250),
        }
    }

    #[test]
    fn test_featured_query_pairs() {
        let pairs = ProductQuery::featured(8).query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("select".to_owned(), "*".to_owned()),
                ("order".to_owned(), "id.desc".to_owned()),
                ("limit".to_owned(), "8".to_owned()),
            ]
        );
    }

    #[test]
    fn test_category_query_pairs() {
        let pairs = ProductQuery::in_category("Dresses").query_pairs();
        assert!(pairs.contains(&("category".to_owned(), "eq.Dresses".to_owned())));
        assert!(!pairs.iter().any(|(key, _)| key == "limit"));
    }

    #[test]
    fn test_oldest_first_sort_value() {
        let query = ProductQuery {
            order: ProductOrder::OldestFirst,
            ..ProductQuery::default()
        };
        assert!(query
            .query_pairs()
            .contains(&("order".to_owned(), "id.asc".to_owned())));
    }

    #[tokio::test]
    async fn test_unconfigured_list_reports_unavailable() {
        let client = CatalogClient::from_config(None);
        let err = client.list_products(&ProductQuery::default()).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_unconfigured_get_product_reports_unavailable() {
        let client = CatalogClient::from_config(None);
        let err = client.get_product(ProductId::new(1)).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_unconfigured_submit_reports_unavailable() {
        let client = CatalogClient::from_config(None);
        let err = client.submit_order(&order_payload()).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_write_rejection_passes_backend_message_verbatim() {
        let err = write_rejection(
            StatusCode::CONFLICT,
            r#"{"message": "duplicate key value violates unique constraint"}"#,
        );
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_write_rejection_falls_back_to_raw_body() {
        let err = write_rejection(StatusCode::BAD_REQUEST, "plain text failure");
        assert_eq!(err.to_string(), "plain text failure");
    }

    #[test]
    fn test_write_rejection_empty_body_names_the_status() {
        let err = write_rejection(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "backend answered 502 Bad Gateway");
    }
}
