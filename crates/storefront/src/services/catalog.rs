//! Catalog reads: full listing, search, featured shelf and detail.

use blush_core::catalog;
use blush_core::{Product, ProductId};
use blush_store::Store;

use crate::error::{AppError, Result};

const LOAD_FAILED: &str = "Failed to load products";

pub struct CatalogService<'a> {
    store: &'a dyn Store,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every product matching `term` (all of them for a blank term).
    ///
    /// # Errors
    ///
    /// "Failed to load products" when the store cannot be read.
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Product>> {
        let products = self.load().await?;
        let term = term.unwrap_or_default();
        Ok(catalog::search(&products, term).into_iter().cloned().collect())
    }

    /// The first `limit` featured products.
    ///
    /// # Errors
    ///
    /// "Failed to load products" when the store cannot be read.
    pub async fn featured(&self, limit: usize) -> Result<Vec<Product>> {
        let products = self.load().await?;
        Ok(catalog::featured(&products, limit).into_iter().cloned().collect())
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.store
            .get_product(id)
            .await
            .map_err(AppError::store(LOAD_FAILED))?
            .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))
    }

    async fn load(&self) -> Result<Vec<Product>> {
        self.store
            .list_products()
            .await
            .map_err(AppError::store(LOAD_FAILED))
    }
}
