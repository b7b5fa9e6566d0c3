//! Per-browsing-session storefront state.
//!
//! One [`StorefrontSession`] per visitor. It owns the in-memory cart,
//! mirrors every mutation to the [`CartStore`], and holds the signed-in
//! identity. The identity gate runs before every cart mutation and before
//! checkout: with nobody signed in the action is rejected outright and
//! nothing is queued for replay.

use secrecy::SecretString;
use tracing::{instrument, warn};

use rivaaj_core::{PaymentMethod, ProductRecord};

use crate::auth::{AuthenticatedUser, CurrentUser, IdentityGateway, NewCustomer};
use crate::backend::OrderGateway;
use crate::cart::{Cart, CartStore, LineKey, VariantChoice};
use crate::checkout::{OrderPayload, PlacedOrder, ShippingInfo};
use crate::error::{Result, StorefrontError};

/// Cart, identity and UI signals for one browsing session.
pub struct StorefrontSession {
    store: CartStore,
    cart: Cart,
    cart_open: bool,
    identity: Option<AuthenticatedUser>,
}

impl StorefrontSession {
    /// Start a session, restoring whatever cart the store holds.
    ///
    /// Restoration is fail-soft: a corrupt or missing slot yields an
    /// empty cart. Identity never survives a restart; the visitor signs
    /// in again.
    #[must_use]
    pub fn restore(store: CartStore) -> Self {
        let cart = store.load();
        Self {
            store,
            cart,
            cart_open: false,
            identity: None,
        }
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    #[must_use]
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Token for the signed-in identity, for callers that make their own
    /// authenticated requests.
    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.identity.as_ref().map(|identity| &identity.access_token)
    }

    /// Sign in through the identity gateway.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Auth`] when the gateway rejects the
    /// credentials or is unavailable.
    #[instrument(skip_all)]
    pub async fn login(
        &mut self,
        identity: &impl IdentityGateway,
        email: &str,
        password: &str,
    ) -> Result<&CurrentUser> {
        let authenticated = identity.login(email, password).await?;
        Ok(&self.identity.insert(authenticated).user)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Auth`] when the profile fails the
    /// gateway's validation or the service rejects the registration.
    #[instrument(skip_all)]
    pub async fn register(
        &mut self,
        identity: &impl IdentityGateway,
        customer: &NewCustomer,
    ) -> Result<&CurrentUser> {
        let authenticated = identity.register(customer).await?;
        Ok(&self.identity.insert(authenticated).user)
    }

    /// Sign out. The local identity is cleared even when remote token
    /// revocation fails; the visitor asked to leave, so they leave.
    #[instrument(skip_all)]
    pub async fn logout(&mut self, identity: &impl IdentityGateway) {
        if let Some(authenticated) = self.identity.take() {
            if let Err(err) = identity.logout(&authenticated.access_token).await {
                warn!(error = %err, "remote logout failed, local session cleared anyway");
            }
        }
    }

    fn require_auth(&self) -> Result<()> {
        if self.identity.is_none() {
            return Err(StorefrontError::AuthenticationRequired);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether the UI should show the cart panel right now.
    #[must_use]
    pub const fn cart_open(&self) -> bool {
        self.cart_open
    }

    pub fn set_cart_open(&mut self, open: bool) {
        self.cart_open = open;
    }

    /// Add a product to the cart. Gated; opens the cart panel on success.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::AuthenticationRequired`] with nobody signed in;
    /// the cart is untouched.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &ProductRecord,
        quantity: u32,
        variant: VariantChoice,
    ) -> Result<()> {
        self.require_auth()?;
        self.cart.add(product, quantity, variant);
        self.persist();
        self.cart_open = true;
        Ok(())
    }

    /// Overwrite a line's quantity. Zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::AuthenticationRequired`] with nobody signed in.
    #[instrument(skip(self, key))]
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i32) -> Result<()> {
        self.require_auth()?;
        self.cart.set_quantity(key, quantity);
        self.persist();
        Ok(())
    }

    /// Remove a line outright.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::AuthenticationRequired`] with nobody signed in.
    #[instrument(skip(self, key))]
    pub fn remove_from_cart(&mut self, key: &LineKey) -> Result<()> {
        self.require_auth()?;
        self.cart.remove(key);
        self.persist();
        Ok(())
    }

    /// Mirror the cart to disk. Best-effort: the in-memory cart stays
    /// authoritative when the write fails.
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.cart) {
            warn!(error = %err, "failed to persist cart");
        }
    }

    // ------------------------------------------------------------------
    // Checkout
    // ------------------------------------------------------------------

    /// Place the order: gate, validate, price, submit, then clear.
    ///
    /// The cart is cleared (and the empty cart persisted) only after the
    /// gateway confirms the insert. Any earlier failure leaves the cart
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::AuthenticationRequired`] with nobody signed in,
    /// [`StorefrontError::Validation`] for blank required fields or an
    /// empty cart, [`StorefrontError::Gateway`] when submission fails.
    #[instrument(skip_all)]
    pub async fn place_order(
        &mut self,
        gateway: &impl OrderGateway,
        shipping: ShippingInfo,
        method: PaymentMethod,
    ) -> Result<PlacedOrder> {
        self.require_auth()?;
        let (payload, totals) = OrderPayload::build(&self.cart, shipping, method)?;
        let order_id = gateway.submit_order(&payload).await?;
        self.cart.clear();
        self.persist();
        self.cart_open = false;
        Ok(PlacedOrder {
            id: order_id,
            totals,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use async_trait::async_trait;
    use rivaaj_core::{Email, GatewayError, OrderId, Price, ProductId, UserId};
    use std::result::Result;
    use std::sync::Mutex;
    use uuid::Uuid;

    // --- fakes ---------------------------------------------------------

    struct FakeIdentity {
        fail_logout: bool,
    }

    impl FakeIdentity {
        const fn accepting() -> Self {
            Self { fail_logout: false }
        }
    }

    #[async_trait]
    impl IdentityGateway for FakeIdentity {
        async fn login(&self, email: &str, _password: &str) -> Result<AuthenticatedUser, AuthError> {
            Ok(AuthenticatedUser {
                user: CurrentUser {
                    id: UserId::new(Uuid::new_v4()),
                    email: Email::parse(email).map_err(AuthError::InvalidEmail)?,
                    full_name: "Ayesha Khan".to_owned(),
                },
                access_token: SecretString::from("token-1"),
            })
        }

        async fn register(&self, customer: &NewCustomer) -> Result<AuthenticatedUser, AuthError> {
            customer.validate()?;
            self.login(&customer.email, &customer.password).await
        }

        async fn logout(&self, _access_token: &SecretString) -> Result<(), AuthError> {
            if self.fail_logout {
                return Err(AuthError::unavailable("identity service down"));
            }
            Ok(())
        }

        async fn request_password_reset(&self, _email: &str) -> Result<(), AuthError> {
            Ok(())
        }

        async fn confirm_password_reset(
            &self,
            _email: &str,
            _code: &str,
            _new_password: &str,
        ) -> Result<(), AuthError> {
            Ok(())
        }
    }

    struct FakeOrders {
        fail: bool,
        submitted: Mutex<Vec<OrderPayload>>,
    }

    impl FakeOrders {
        fn accepting() -> Self {
            Self {
                fail: false,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submissions(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OrderGateway for FakeOrders {
        async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderId, GatewayError> {
            self.submitted.lock().unwrap().push(payload.clone());
            if self.fail {
                return Err(GatewayError::unavailable("backend down"));
            }
            Ok(OrderId::new(501))
        }
    }

    // --- fixtures ------------------------------------------------------

    fn product(id: i64, rupees: i64) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(rupees),
            original_price: None,
            category: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            image_urls: Vec::new(),
            stock: None,
            created_at: None,
        }
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "Ayesha Khan".to_owned(),
            email: "ayesha@example.com".to_owned(),
            phone: "0300-1234567".to_owned(),
            address: "House 12, Street 4".to_owned(),
            city: "Lahore".to_owned(),
            postal_code: String::new(),
        }
    }

    fn session_in(dir: &tempfile::TempDir) -> StorefrontSession {
        StorefrontSession::restore(CartStore::in_dir(dir.path()))
    }

    async fn signed_in_session(dir: &tempfile::TempDir) -> StorefrontSession {
        let mut session = session_in(dir);
        session
            .login(&FakeIdentity::accepting(), "ayesha@example.com", "kurta-season")
            .await
            .unwrap();
        session
    }

    // --- gate ----------------------------------------------------------

    #[tokio::test]
    async fn test_signed_out_add_is_rejected_with_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);

        let err = session
            .add_to_cart(&product(1, 2500), 1, VariantChoice::none())
            .unwrap_err();

        assert!(err.requires_sign_in());
        assert!(session.cart().is_empty());
        assert!(!session.cart_open());
        assert!(CartStore::in_dir(dir.path()).load().is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_quantity_and_remove_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let key = LineKey::new(ProductId::new(1), VariantChoice::none());

        assert!(session.set_quantity(&key, 3).unwrap_err().requires_sign_in());
        assert!(session.remove_from_cart(&key).unwrap_err().requires_sign_in());
    }

    #[tokio::test]
    async fn test_gate_runs_before_checkout_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let orders = FakeOrders::accepting();

        // Cart empty AND signed out: the gate answers first.
        let err = session
            .place_order(&orders, shipping(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();

        assert!(err.requires_sign_in());
        assert_eq!(orders.submissions(), 0);
    }

    // --- cart flow -----------------------------------------------------

    #[tokio::test]
    async fn test_add_persists_and_opens_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;

        session
            .add_to_cart(&product(1, 2500), 2, VariantChoice::none())
            .unwrap();

        assert_eq!(session.cart().total_items(), 2);
        assert!(session.cart_open());
        assert_eq!(CartStore::in_dir(dir.path()).load(), *session.cart());
    }

    #[tokio::test]
    async fn test_quantity_update_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 2500), 2, VariantChoice::none())
            .unwrap();

        let key = LineKey::new(ProductId::new(1), VariantChoice::none());
        session.set_quantity(&key, 5).unwrap();

        assert_eq!(CartStore::in_dir(dir.path()).load().total_items(), 5);
    }

    #[tokio::test]
    async fn test_restore_picks_up_persisted_cart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = signed_in_session(&dir).await;
            session
                .add_to_cart(&product(1, 2500), 2, VariantChoice::none())
                .unwrap();
        }

        let revived = session_in(&dir);
        assert_eq!(revived.cart().total_items(), 2);
        assert!(!revived.is_authenticated());
    }

    // --- checkout ------------------------------------------------------

    #[tokio::test]
    async fn test_place_order_clears_cart_only_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 8999), 1, VariantChoice::none())
            .unwrap();
        let orders = FakeOrders::accepting();

        let placed = session
            .place_order(&orders, shipping(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap();

        assert_eq!(placed.id, OrderId::new(501));
        assert_eq!(placed.totals.total, Price::new(9349));
        assert!(session.cart().is_empty());
        assert!(!session.cart_open());
        assert!(CartStore::in_dir(dir.path()).load().is_empty());
        assert_eq!(orders.submissions(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_cart_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 8999), 1, VariantChoice::none())
            .unwrap();
        let orders = FakeOrders::failing();

        let err = session
            .place_order(&orders, shipping(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();

        assert!(matches!(err, StorefrontError::Gateway(inner) if inner.is_unavailable()));
        assert_eq!(session.cart().total_items(), 1);
        assert_eq!(CartStore::in_dir(dir.path()).load().total_items(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_the_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        let orders = FakeOrders::accepting();

        let err = session
            .place_order(&orders, shipping(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorefrontError::Validation(crate::checkout::ValidationError::EmptyCart)
        ));
        assert_eq!(orders.submissions(), 0);
    }

    #[tokio::test]
    async fn test_blank_shipping_field_never_reaches_the_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 8999), 1, VariantChoice::none())
            .unwrap();
        let orders = FakeOrders::accepting();

        let mut details = shipping();
        details.city.clear();
        let err = session
            .place_order(&orders, details, PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "city is required");
        assert_eq!(orders.submissions(), 0);
        assert_eq!(session.cart().total_items(), 1);
    }

    #[tokio::test]
    async fn test_submitted_payload_carries_pending_status_and_totals() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 8999), 1, VariantChoice::none())
            .unwrap();
        let orders = FakeOrders::accepting();

        session
            .place_order(&orders, shipping(), PaymentMethod::DigitalWalletTransfer)
            .await
            .unwrap();

        let submitted = orders.submitted.lock().unwrap();
        let payload = submitted.first().unwrap();
        assert_eq!(payload.status.as_str(), "Pending");
        assert_eq!(payload.total_price, Price::new(9249));
        assert_eq!(payload.order_items.len(), 1);
    }

    // --- identity lifecycle --------------------------------------------

    #[tokio::test]
    async fn test_login_exposes_current_user() {
        let dir = tempfile::tempdir().unwrap();
        let session = signed_in_session(&dir).await;

        let user = session.current_user().unwrap();
        assert_eq!(user.email.as_str(), "ayesha@example.com");
        assert!(session.access_token().is_some());
    }

    #[tokio::test]
    async fn test_register_signs_the_customer_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let customer = NewCustomer {
            full_name: "Ayesha Khan".to_owned(),
            email: "ayesha@example.com".to_owned(),
            phone: "0300-1234567".to_owned(),
            password: "kurta-season".to_owned(),
        };

        session
            .register(&FakeIdentity::accepting(), &customer)
            .await
            .unwrap();

        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_identity_even_when_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;

        session.logout(&FakeIdentity { fail_logout: true }).await;

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_logout_keeps_the_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = signed_in_session(&dir).await;
        session
            .add_to_cart(&product(1, 2500), 1, VariantChoice::none())
            .unwrap();

        session.logout(&FakeIdentity::accepting()).await;

        assert_eq!(session.cart().total_items(), 1);
    }
}
