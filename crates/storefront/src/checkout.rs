//! Checkout totals and order payload assembly.
//!
//! One fee rule, everywhere: every order pays the flat shipping fee, and
//! cash-on-delivery orders pay the handling surcharge on top. Digital
//! wallet transfers pay no surcharge.

use serde::{Deserialize, Serialize};

use rivaaj_core::{OrderId, OrderStatus, PaymentMethod, Price};

use crate::cart::{Cart, CartLineItem};

/// Flat delivery fee charged on every order.
pub const SHIPPING_FEE: Price = Price::new(250);

/// Handling surcharge for cash-on-delivery orders.
pub const COD_SURCHARGE: Price = Price::new(100);

/// Local validation failures raised before anything leaves the device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required shipping field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Checkout was attempted with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,
}

/// Itemized totals for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    /// Sum of cart line totals.
    pub subtotal: Price,
    pub shipping_fee: Price,
    /// Zero unless paying cash on delivery.
    pub cod_surcharge: Price,
    /// Final amount payable.
    pub total: Price,
}

/// Price an order: subtotal plus shipping plus any payment surcharge.
#[must_use]
pub fn checkout_totals(subtotal: Price, method: PaymentMethod) -> CheckoutTotals {
    let cod_surcharge = if method.is_cash_on_delivery() {
        COD_SURCHARGE
    } else {
        Price::ZERO
    };
    CheckoutTotals {
        subtotal,
        shipping_fee: SHIPPING_FEE,
        cod_surcharge,
        total: subtotal + SHIPPING_FEE + cod_surcharge,
    }
}

/// Delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    /// Optional; some delivery areas have none.
    #[serde(default)]
    pub postal_code: String,
}

impl ShippingInfo {
    /// Check the required fields, reporting the first one that is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            (&self.full_name, "full name"),
            (&self.email, "email"),
            (&self.phone, "phone"),
            (&self.address, "address"),
            (&self.city, "city"),
        ];
        for (value, label) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(label));
            }
        }
        Ok(())
    }
}

/// The order document submitted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer_details: ShippingInfo,
    pub order_items: Vec<CartLineItem>,
    /// Final payable amount, surcharges included.
    pub total_price: Price,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_fee: Price,
}

impl OrderPayload {
    /// Assemble a submittable order from the cart and checkout form.
    ///
    /// Validates shipping details and rejects an empty cart, then prices
    /// the order and snapshots the cart lines. New orders always start in
    /// the `Pending` status.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a required field is blank or the
    /// cart holds nothing.
    pub fn build(
        cart: &Cart,
        shipping: ShippingInfo,
        method: PaymentMethod,
    ) -> Result<(Self, CheckoutTotals), ValidationError> {
        shipping.validate()?;
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        let totals = checkout_totals(cart.total_price(), method);
        let payload = Self {
            customer_details: shipping,
            order_items: cart.items().to_vec(),
            total_price: totals.total,
            status: OrderStatus::pending(),
            payment_method: method,
            shipping_fee: totals.shipping_fee,
        };
        Ok((payload, totals))
    }
}

/// Confirmation handed back to the UI after the backend accepts an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub totals: CheckoutTotals,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::VariantChoice;
    use rivaaj_core::{ProductId, ProductRecord};
    use serde_json::json;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "Ayesha Khan".to_owned(),
            email: "ayesha@example.com".to_owned(),
            phone: "0300-1234567".to_owned(),
            address: "House 12, Street 4, DHA Phase 5".to_owned(),
            city: "Lahore".to_owned(),
            postal_code: String::new(),
        }
    }

    fn cart_worth(rupees: i64) -> Cart {
        let product = ProductRecord {
            id: ProductId::new(1),
            name: "Embroidered Kurta".to_owned(),
            description: None,
            price: Price::new(rupees),
            original_price: None,
            category: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            image_urls: Vec::new(),
            stock: None,
            created_at: None,
        };
        let mut cart = Cart::new();
        cart.add(&product, 1, VariantChoice::none());
        cart
    }

    #[test]
    fn test_cod_order_pays_shipping_and_surcharge() {
        let totals = checkout_totals(Price::new(8999), PaymentMethod::CashOnDelivery);

        assert_eq!(totals.subtotal, Price::new(8999));
        assert_eq!(totals.shipping_fee, Price::new(250));
        assert_eq!(totals.cod_surcharge, Price::new(100));
        assert_eq!(totals.total, Price::new(9349));
    }

    #[test]
    fn test_wallet_order_pays_shipping_only() {
        let totals = checkout_totals(Price::new(8999), PaymentMethod::DigitalWalletTransfer);

        assert_eq!(totals.cod_surcharge, Price::ZERO);
        assert_eq!(totals.total, Price::new(9249));
    }

    #[test]
    fn test_validate_accepts_complete_details() {
        assert!(shipping().validate().is_ok());
    }

    #[test]
    fn test_validate_names_the_blank_field() {
        let mut details = shipping();
        details.city = "   ".to_owned();

        let err = details.validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("city"));
        assert_eq!(err.to_string(), "city is required");
    }

    #[test]
    fn test_validate_checks_every_required_field() {
        for blank in ["full name", "email", "phone", "address", "city"] {
            let mut details = shipping();
            match blank {
                "full name" => details.full_name.clear(),
                "email" => details.email.clear(),
                "phone" => details.phone.clear(),
                "address" => details.address.clear(),
                _ => details.city.clear(),
            }
            assert_eq!(details.validate(), Err(ValidationError::MissingField(blank)));
        }
    }

    #[test]
    fn test_postal_code_is_optional() {
        let mut details = shipping();
        details.postal_code = String::new();
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_build_rejects_empty_cart() {
        let err = OrderPayload::build(&Cart::new(), shipping(), PaymentMethod::CashOnDelivery)
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyCart);
    }

    #[test]
    fn test_build_rejects_blank_field_before_totals() {
        let mut details = shipping();
        details.email.clear();

        let err = OrderPayload::build(&cart_worth(100), details, PaymentMethod::CashOnDelivery)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("email"));
    }

    #[test]
    fn test_build_prices_and_snapshots_the_cart() {
        let cart = cart_worth(8999);
        let (payload, totals) =
            OrderPayload::build(&cart, shipping(), PaymentMethod::CashOnDelivery).unwrap();

        assert_eq!(totals.total, Price::new(9349));
        assert_eq!(payload.total_price, Price::new(9349));
        assert_eq!(payload.order_items.len(), 1);
        assert_eq!(payload.status, OrderStatus::pending());
    }

    #[test]
    fn test_payload_wire_shape() {
        let (payload, _) =
            OrderPayload::build(&cart_worth(8999), shipping(), PaymentMethod::CashOnDelivery)
                .unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json.get("status"), Some(&json!("Pending")));
        assert_eq!(json.get("paymentMethod"), Some(&json!("cash_on_delivery")));
        assert_eq!(json.get("totalPrice"), Some(&json!(9349)));
        assert_eq!(json.get("shippingFee"), Some(&json!(250)));
        assert!(json.get("customerDetails").is_some());
        assert!(json.get("orderItems").is_some());
        assert_eq!(
            json.get("customerDetails").and_then(|d| d.get("fullName")),
            Some(&json!("Ayesha Khan"))
        );
    }
}
