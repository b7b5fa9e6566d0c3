//! Back-office operations over an [`AdminGateway`].
//!
//! The console sequences multi-step admin flows. The one with real
//! ordering concerns is product/category creation with an image: upload
//! first, then insert the record carrying the image's public URL, and on
//! insert failure delete the just-uploaded image so storage doesn't
//! accumulate orphans. Cleanup is best-effort; the insert error is what
//! the caller sees either way.

use tracing::{info, instrument, warn};

use rivaaj_core::{
    CategoryId, CategoryRecord, GatewayError, OrderId, OrderStatus, ProductId, ProductRecord,
};

use crate::backend::{AdminGateway, ImageUpload, NewCategory, NewProduct};

/// Staff-facing operations, generic over the backend seam.
#[derive(Debug, Clone)]
pub struct AdminConsole<G> {
    gateway: G,
}

impl<G: AdminGateway + Sync> AdminConsole<G> {
    #[must_use]
    pub const fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Move an order to a new status.
    ///
    /// The status value passes through unchecked; the set of meaningful
    /// statuses belongs to the back office, not this crate.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error when the backend rejects the update
    /// or is unavailable.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &OrderStatus,
    ) -> Result<(), GatewayError> {
        self.gateway.update_order_status(order_id, status).await?;
        info!(%order_id, %status, "order status updated");
        Ok(())
    }

    /// Create a product, optionally uploading its image first.
    ///
    /// The uploaded image's public URL is appended to the product's
    /// image list before the insert. If the insert then fails the image
    /// is deleted again, best-effort.
    ///
    /// # Errors
    ///
    /// Returns the upload error if the image cannot be stored, otherwise
    /// the insert error.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn create_product(
        &self,
        mut product: NewProduct,
        image: Option<ImageUpload>,
    ) -> Result<ProductRecord, GatewayError> {
        let uploaded_url = match image {
            Some(upload) => {
                let url = self.gateway.upload_image(&upload).await?;
                product.image_urls.push(url.clone());
                Some(url)
            }
            None => None,
        };

        match self.gateway.insert_product(&product).await {
            Ok(record) => Ok(record),
            Err(err) => {
                if let Some(url) = uploaded_url {
                    self.discard_uploaded_image(&url).await;
                }
                Err(err)
            }
        }
    }

    /// Delete a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error when the delete is rejected.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        self.gateway.delete_product(id).await
    }

    /// Create a category, optionally uploading its image first. Same
    /// upload/insert/cleanup sequence as [`Self::create_product`].
    ///
    /// # Errors
    ///
    /// Returns the upload error if the image cannot be stored, otherwise
    /// the insert error.
    #[instrument(skip_all, fields(name = %category.name))]
    pub async fn create_category(
        &self,
        mut category: NewCategory,
        image: Option<ImageUpload>,
    ) -> Result<CategoryRecord, GatewayError> {
        let uploaded_url = match image {
            Some(upload) => {
                let url = self.gateway.upload_image(&upload).await?;
                category.image_url = Some(url.clone());
                Some(url)
            }
            None => None,
        };

        match self.gateway.insert_category(&category).await {
            Ok(record) => Ok(record),
            Err(err) => {
                if let Some(url) = uploaded_url {
                    self.discard_uploaded_image(&url).await;
                }
                Err(err)
            }
        }
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error when the delete is rejected.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), GatewayError> {
        self.gateway.delete_category(id).await
    }

    /// Best-effort removal of an image whose record insert failed.
    async fn discard_uploaded_image(&self, url: &str) {
        if let Err(err) = self.gateway.delete_image(url).await {
            warn!(error = %err, url, "failed to clean up uploaded image after insert failure");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
