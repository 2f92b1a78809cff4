//! Product records as seen by the catalog and by the cart.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as returned by the catalog's `products/{id}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    pub image_url: String,
}

impl CatalogProduct {
    /// Turn the catalog record into a cart line holding a single unit.
    #[must_use]
    pub fn into_cart_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            amount: 1,
        }
    }
}

/// A product held in the cart, with the quantity the shopper wants.
///
/// This is also the persisted shape: the cart is stored as a JSON array of
/// these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    pub image_url: String,
    /// Quantity in the cart. Always at least 1 while the product is present.
    pub amount: u32,
}

impl Product {
    /// Price of this line (unit price times amount).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// Remote stock level for a product, from the catalog's `stock/{id}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    /// Units available remotely.
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_product_from_api_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "imageUrl": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg"
        }"#;

        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Tênis de Caminhada Leve Confortável");
        assert_eq!(product.price, Price::from_cents(17990));

        let line = product.into_cart_product();
        assert_eq!(line.amount, 1);
        assert_eq!(line.id, ProductId::new(1));
    }

    #[test]
    fn test_product_uses_camel_case_fields() {
        let product = Product {
            id: ProductId::new(2),
            name: "Tênis VR Caminhada Confortável".to_string(),
            price: Price::from_cents(13990),
            image_url: "https://example.com/tenis2.jpg".to_string(),
            amount: 2,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["imageUrl"], "https://example.com/tenis2.jpg");
        assert_eq!(value["amount"], 2);
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn test_line_total() {
        let product = Product {
            id: ProductId::new(3),
            name: "Tênis Adidas Duramo Lite 2.0".to_string(),
            price: Price::from_cents(21990),
            image_url: String::new(),
            amount: 3,
        };
        assert_eq!(product.line_total(), Price::from_cents(65970));
    }

    #[test]
    fn test_stock_info_from_api_json() {
        let stock: StockInfo = serde_json::from_str(r#"{"id": 1, "amount": 3}"#).unwrap();
        assert_eq!(stock.amount, 3);
    }
}
