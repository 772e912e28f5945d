//! Product management: listing, create, update, delete, featured toggle.

use blush_core::catalog;
use blush_core::{Product, ProductForm, ProductId};
use blush_store::{Store, StoreError};

use crate::error::{AppError, Result};

pub struct ProductManager<'a> {
    store: &'a dyn Store,
}

impl<'a> ProductManager<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Products matching `term`, optionally only the low-stock ones.
    ///
    /// # Errors
    ///
    /// "Failed to load products" when the store cannot be read.
    pub async fn list(&self, term: Option<&str>, low_stock_only: bool) -> Result<Vec<Product>> {
        let products = self.load().await?;
        Ok(catalog::search(&products, term.unwrap_or_default())
            .into_iter()
            .filter(|p| !low_stock_only || p.is_low_stock())
            .cloned()
            .collect())
    }

    /// Distinct categories, first seen first.
    ///
    /// # Errors
    ///
    /// "Failed to load products" when the store cannot be read.
    pub async fn categories(&self) -> Result<Vec<String>> {
        Ok(catalog::categories(&self.load().await?))
    }

    /// # Errors
    ///
    /// [`AppError::Product`] for a blank name or category.
    pub async fn create(&self, form: ProductForm) -> Result<Product> {
        let draft = form.into_draft()?;
        let product = self
            .store
            .add_product(draft)
            .await
            .map_err(AppError::store("Failed to save product"))?;
        tracing::info!(product_id = %product.id, status = %product.status, "Product created");
        Ok(product)
    }

    /// Overwrite a product; `created_at` is kept.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn update(&self, id: ProductId, form: ProductForm) -> Result<Product> {
        let draft = form.into_draft()?;
        let product = self
            .store
            .update_product(id, draft)
            .await
            .map_err(not_found_or("Failed to save product"))?;
        tracing::info!(product_id = %id, status = %product.status, "Product updated");
        Ok(product)
    }

    /// Remove a product. Its orders stay and drop out of the order listing.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.store
            .delete_product(id)
            .await
            .map_err(not_found_or("Failed to delete product"))?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Flip the featured flag and nothing else.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn toggle_featured(&self, id: ProductId) -> Result<Product> {
        self.store
            .toggle_featured(id)
            .await
            .map_err(not_found_or("Failed to update product"))
    }

    async fn load(&self) -> Result<Vec<Product>> {
        self.store
            .list_products()
            .await
            .map_err(AppError::store("Failed to load products"))
    }
}

fn not_found_or(message: &'static str) -> impl Fn(StoreError) -> AppError {
    move |err| match err {
        StoreError::NotFound => AppError::NotFound("Product not found".to_owned()),
        other => AppError::store(message)(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use blush_core::{FormNumber, Price, StockStatus};
    use blush_store::{MemoryStore, ProductStore};

    use super::*;
    use crate::services::test_support::product;

    fn form(name: &str, price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_owned(),
            category: "Face".to_owned(),
            price: FormNumber::Text(price.to_owned()),
            stock: FormNumber::Text(stock.to_owned()),
            ..ProductForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_derives_status_and_coerces() {
        let store = MemoryStore::new();
        let manager = ProductManager::new(&store);

        let created = manager.create(form("Bronzer", "oops", "12")).await.unwrap();
        assert_eq!(created.price, Price::ZERO);
        assert_eq!(created.status, StockStatus::LowStock);
        assert!(!created.featured);

        let created = manager.create(form("Primer", "15", "-2")).await.unwrap();
        assert_eq!(created.stock, 0);
        assert_eq!(created.status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_without_write() {
        let store = MemoryStore::new();
        let err = ProductManager::new(&store)
            .create(form("  ", "5", "5"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = MemoryStore::new();
        let original = product(&store, "Blush", "Face", 40).await;

        let updated = ProductManager::new(&store)
            .update(original.id, form("Cream Blush", "22.00", "5"))
            .await
            .unwrap();
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.name, "Cream Blush");
        assert_eq!(updated.status, StockStatus::LowStock);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = ProductManager::new(&store)
            .update(ProductId::new(404), form("Ghost", "1", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let store = MemoryStore::new();
        let keep = product(&store, "Keep", "Lips", 30).await;
        let gone = product(&store, "Gone", "Lips", 30).await;
        let manager = ProductManager::new(&store);

        manager.delete(gone.id).await.unwrap();
        let listed = manager.list(None, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().unwrap().id, keep.id);

        assert!(matches!(
            manager.delete(gone.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_toggle_featured_touches_only_the_flag() {
        let store = MemoryStore::new();
        let before = product(&store, "Palette", "Eyes", 8).await;
        let manager = ProductManager::new(&store);

        let after = manager.toggle_featured(before.id).await.unwrap();
        assert!(after.featured);
        assert_eq!(after.price, before.price);
        assert_eq!(after.stock, before.stock);
        assert_eq!(after.status, before.status);

        assert!(!manager.toggle_featured(before.id).await.unwrap().featured);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = MemoryStore::new();
        product(&store, "Lip Oil", "Lips", 5).await;
        product(&store, "Lip Liner", "Lips", 50).await;
        product(&store, "Kohl", "Eyes", 3).await;
        let manager = ProductManager::new(&store);

        assert_eq!(manager.list(Some("LIP"), false).await.unwrap().len(), 2);
        assert_eq!(manager.list(None, true).await.unwrap().len(), 2);
        assert_eq!(manager.list(Some("lip"), true).await.unwrap().len(), 1);
        assert_eq!(manager.categories().await.unwrap(), vec!["Lips", "Eyes"]);
    }

    #[tokio::test]
    async fn test_load_failure_notification() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = ProductManager::new(&store).list(None, false).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store {
                message: "Failed to load products",
                ..
            }
        ));
    }
}
