//! Dashboard statistics.

use std::collections::HashSet;

use serde::Serialize;

use blush_core::{Order, OrderStatus, Price, Product, ProductId};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Sum over every recorded order, orphans included.
    pub total_sales: Price,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub total_products: usize,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub featured_products: usize,
    /// Distinct customer emails across all orders.
    pub total_customers: usize,
    /// Orders whose product has been deleted.
    pub orphaned_orders: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order]) -> Self {
        let product_ids: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
        let customers: HashSet<&str> = orders.iter().map(|o| o.customer_email.as_str()).collect();

        Self {
            total_sales: orders.iter().map(|o| o.total_amount).sum(),
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            total_products: products.len(),
            low_stock_products: products.iter().filter(|p| p.is_low_stock()).count(),
            out_of_stock_products: products.iter().filter(|p| p.stock == 0).count(),
            featured_products: products.iter().filter(|p| p.featured).count(),
            total_customers: customers.len(),
            orphaned_orders: orders
                .iter()
                .filter(|o| !product_ids.contains(&o.product_id))
                .count(),
        }
    }
}
