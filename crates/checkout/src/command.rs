//! The place-order command.

use domain::{CartItem, Money, ValidationError};

/// Request to turn a cart into an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub items: Vec<CartItem>,
    /// Total the client computed. Informational only; the stored total is
    /// always recomputed from catalog prices.
    pub total_price: Option<Money>,
}

impl PlaceOrder {
    /// Creates a new command with no phone and no declared total.
    pub fn new(
        customer_name: impl Into<String>,
        email: impl Into<String>,
        items: Vec<CartItem>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            email: email.into(),
            phone: None,
            items,
            total_price: None,
        }
    }

    /// Sets the contact phone.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the client-declared total.
    pub fn with_total_price(mut self, total: Money) -> Self {
        self.total_price = Some(total);
        self
    }

    /// Checks required fields without looking at the catalog.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_name.trim().is_empty() {
            return Err(ValidationError::CustomerNameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if self.items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(ValidationError::InvalidQuantity {
                product_id: item.product_id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PlaceOrder {
        PlaceOrder::new("Ada", "ada@example.com", vec![CartItem::new(1, 2)])
    }

    #[test]
    fn test_valid_command_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_blank_customer_name_is_rejected() {
        let mut cmd = valid();
        cmd.customer_name = "   ".to_string();
        assert_eq!(cmd.validate(), Err(ValidationError::CustomerNameRequired));
    }

    #[test]
    fn test_empty_email_is_rejected() {
        let mut cmd = valid();
        cmd.email = String::new();
        assert_eq!(cmd.validate(), Err(ValidationError::EmailRequired));
    }

    #[test]
    fn test_empty_items_are_rejected() {
        let mut cmd = valid();
        cmd.items.clear();
        assert_eq!(cmd.validate(), Err(ValidationError::NoItems));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut cmd = valid();
        cmd.items.push(CartItem::new(3, 0));
        assert!(matches!(
            cmd.validate(),
            Err(ValidationError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let cmd = valid()
            .with_phone("+48 600 000 000")
            .with_total_price(Money::from_cents(1198));
        assert_eq!(cmd.phone.as_deref(), Some("+48 600 000 000"));
        assert_eq!(cmd.total_price, Some(Money::from_cents(1198)));
    }
}
