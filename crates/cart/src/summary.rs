//! Display snapshot of a cart.

use std::fmt;

use rocket_shoes_core::{CurrencyCode, Price, Product, ProductId};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub amount: u32,
    pub price: String,
    pub line_total: String,
    pub image_url: String,
}

/// Cart display data: formatted lines, item count and subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub items: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: String,
}

impl CartSummary {
    /// Build a summary of `products`, formatting prices in `currency`.
    #[must_use]
    pub fn new(products: &[Product], currency: CurrencyCode) -> Self {
        let subtotal: Price = products.iter().map(Product::line_total).sum();

        Self {
            items: products
                .iter()
                .map(|p| CartLineView {
                    id: p.id,
                    name: p.name.clone(),
                    amount: p.amount,
                    price: p.price.format(currency),
                    line_total: p.line_total().format(currency),
                    image_url: p.image_url.clone(),
                })
                .collect(),
            item_count: products.iter().map(|p| u64::from(p.amount)).sum(),
            subtotal: subtotal.format(currency),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for CartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Cart is empty");
        }

        for item in &self.items {
            writeln!(
                f,
                "#{:<4} {:<40} {:>3} x {:>12} = {:>12}",
                item.id, item.name, item.amount, item.price, item.line_total
            )?;
        }
        writeln!(f, "{} item(s), subtotal {}", self.item_count, self.subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, cents: i64, amount: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Sneaker {id}"),
            price: Price::from_cents(cents),
            image_url: String::new(),
            amount,
        }
    }

    #[test]
    fn test_summary_totals() {
        let products = vec![line(1, 17990, 2), line(2, 13990, 1)];

        let summary = CartSummary::new(&products, CurrencyCode::USD);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, "$499.70");
        assert_eq!(summary.items[0].line_total, "$359.80");
        assert_eq!(summary.items[1].price, "$139.90");
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::new(&[], CurrencyCode::BRL);

        assert!(summary.is_empty());
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.subtotal, "R$ 0,00");
        assert_eq!(summary.to_string(), "Cart is empty\n");
    }

    #[test]
    fn test_summary_display_lists_lines() {
        let summary = CartSummary::new(&[line(7, 1000, 1)], CurrencyCode::USD);
        let rendered = summary.to_string();

        assert!(rendered.contains("Sneaker 7"));
        assert!(rendered.contains("1 item(s), subtotal $10.00"));
    }
}
