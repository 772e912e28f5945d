//! Business logic behind the admin routes.

pub mod dashboard;
pub mod orders;
pub mod products;

pub use dashboard::DashboardStats;
pub use orders::{OrderRow, OrderViewer};
pub use products::ProductManager;

#[cfg(test)]
pub(crate) mod test_support {
    use blush_core::{Customer, Email, NewOrder, Order, Price, Product, ProductDraft, ProductId, Quantity};
    use blush_store::{MemoryStore, OrderStore, ProductStore};

    pub fn draft(name: &str, category: &str, stock: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            category: category.to_owned(),
            price: Price::coerce("10.00"),
            stock,
            description: None,
            image: None,
            featured: false,
        }
    }

    #[allow(clippy::unwrap_used)]
    pub async fn product(store: &MemoryStore, name: &str, category: &str, stock: u32) -> Product {
        store.add_product(draft(name, category, stock)).await.unwrap()
    }

    #[allow(clippy::unwrap_used)]
    pub async fn order(store: &MemoryStore, product_id: ProductId, email: &str, quantity: u32) -> Order {
        store
            .place_order(NewOrder {
                product_id,
                quantity: Quantity::new(quantity).unwrap(),
                customer: Customer {
                    name: "Test Customer".to_owned(),
                    email: Email::parse(email).unwrap(),
                    phone: "555-0100".to_owned(),
                },
                shipping_address: "1 Test Lane".to_owned(),
                delivery_fee: Price::ZERO,
            })
            .await
            .unwrap()
            .order
    }
}
