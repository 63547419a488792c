//! Cart line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product: a cart line without a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Externally assigned product ID
    pub id: String,

    /// Display title
    pub title: String,

    /// Product image
    pub image_url: String,

    /// Unit price in currency units; a plain JSON number on the wire
    pub price: Decimal,
}

/// One line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: Decimal,

    /// Always at least 1 while the line is in the cart
    pub quantity: u32,
}

impl CartItem {
    /// Start a new line for `product` with quantity 1
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// Price times quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_product_starts_at_one() {
        let item = CartItem::from_product(Product {
            id: "1".to_string(),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Decimal::from(50),
        });

        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, "1");
        assert_eq!(item.line_total(), Decimal::from(50));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let item = CartItem {
            id: "1".to_string(),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Decimal::from(50),
            quantity: 2,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","title":"Shirt","image_url":"u","price":50.0,"quantity":2}"#
        );
    }

    #[test]
    fn product_accepts_extra_fields() {
        let json = r#"{"id":"3","title":"Cap","image_url":"c","price":19.9,"stock":4}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(199, 1));
    }

    #[test]
    fn integer_price_reads_back_as_number() {
        let product: Product =
            serde_json::from_str(r#"{"id":"1","title":"Chair","image_url":"c","price":400}"#)
                .unwrap();
        assert_eq!(product.price, Decimal::from(400));

        let line = serde_json::to_value(CartItem::from_product(product)).unwrap();
        assert!(line["price"].is_number());
    }

    #[test]
    fn null_price_is_rejected() {
        let json = r#"{"id":"1","title":"Chair","image_url":"c","price":null}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
