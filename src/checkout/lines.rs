use crate::models::{Cart, CartLine, Catalog};

/// Order lines built from a cart, plus the cart entries that had no
/// catalog product behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLines {
    pub lines: Vec<CartLine>,
    pub dropped: Vec<String>,
}

/// Map every cart entry, in cart order, to an order line. Entries whose
/// product is not in the catalog are left out of `lines`.
pub fn resolve_lines(cart: &Cart, catalog: &Catalog) -> ResolvedLines {
    let mut resolved = ResolvedLines::default();
    for entry in cart.iter() {
        match catalog.find(&entry.product_id) {
            Some(product) => resolved.lines.push(CartLine {
                product: product.id.clone(),
                quantity: entry.quantity,
            }),
            None => resolved.dropped.push(entry.product_id.clone()),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("product {id}"),
            category: None,
            offer_price: None,
            in_stock: true,
        }
    }

    #[test]
    fn lines_follow_cart_order() {
        let cart: Cart = [("A", 2), ("B", 1)].into_iter().collect();
        let catalog = Catalog::new(vec![product("B"), product("A")]);

        let resolved = resolve_lines(&cart, &catalog);
        assert_eq!(
            resolved.lines,
            vec![
                CartLine {
                    product: "A".into(),
                    quantity: 2
                },
                CartLine {
                    product: "B".into(),
                    quantity: 1
                },
            ]
        );
        assert!(resolved.dropped.is_empty());
    }

    #[test]
    fn unknown_products_are_dropped() {
        let cart: Cart = [("A", 2), ("X", 1)].into_iter().collect();
        let catalog = Catalog::new(vec![product("A"), product("B")]);

        let resolved = resolve_lines(&cart, &catalog);
        assert_eq!(resolved.lines.len(), 1);
        assert_eq!(resolved.lines[0].product, "A");
        assert_eq!(resolved.dropped, vec!["X".to_string()]);
    }

    #[test]
    fn empty_cart_yields_no_lines() {
        let resolved = resolve_lines(&Cart::new(), &Catalog::new(vec![product("A")]));
        assert_eq!(resolved, ResolvedLines::default());
    }
}
