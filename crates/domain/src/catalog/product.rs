use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::Money;

/// A purchasable product and its live stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub description: String,
    /// Measurement unit label, e.g. `kg` or `pc`.
    pub unit: String,
    pub stock: u32,
    /// Display glyph shown next to the product name.
    #[serde(default)]
    pub image: String,
    pub origin: String,
}

impl Product {
    /// Creates a product with no image.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        price: Money,
        unit: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            description: String::new(),
            unit: unit.into(),
            stock,
            image: String::new(),
            origin: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the image glyph.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Returns true if `quantity` units can be taken from stock.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

/// The catalog a fresh installation starts with.
pub(crate) fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Bananas", Money::from_cents(599), "kg", 100)
            .with_description("Fresh bananas from Uganda and Tanzania")
            .with_image("🍌")
            .with_origin("Uganda, Tanzania"),
        Product::new(2, "Coconuts", Money::from_cents(899), "pc", 50)
            .with_description("Juicy coconuts from the Kenyan coast")
            .with_image("🥥")
            .with_origin("Kenya"),
        Product::new(3, "Mango", Money::from_cents(1299), "kg", 75)
            .with_description("Sweet mango from Senegal")
            .with_image("🥭")
            .with_origin("Senegal"),
        Product::new(4, "Papaya", Money::from_cents(999), "kg", 60)
            .with_description("Ripe papayas from Ghana")
            .with_image("🍈")
            .with_origin("Ghana"),
        Product::new(5, "Pineapple", Money::from_cents(799), "pc", 80)
            .with_description("Juicy pineapples from Ivory Coast")
            .with_image("🍍")
            .with_origin("Ivory Coast"),
        Product::new(6, "Watermelon", Money::from_cents(499), "kg", 120)
            .with_description("Sweet watermelons from Egypt")
            .with_image("🍉")
            .with_origin("Egypt"),
        Product::new(7, "Passion fruit", Money::from_cents(1599), "kg", 40)
            .with_description("Exotic passion fruit from Rwanda")
            .with_image("🫐")
            .with_origin("Rwanda"),
        Product::new(8, "Avocado", Money::from_cents(1399), "kg", 90)
            .with_description("Creamy avocados from South Africa")
            .with_image("🥑")
            .with_origin("South Africa"),
    ]
}
