use async_trait::async_trait;
use chrono::{DateTime, Utc};

use blush_core::{Price, Product, ProductDraft, ProductId, StockStatus};

use super::{PgStore, stock_column, stock_value};
use crate::{ProductStore, StoreError};

#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: ProductId,
    name: String,
    category: String,
    price: Price,
    stock: i32,
    status: StockStatus,
    description: Option<String>,
    image: Option<String>,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            category: r.category,
            price: r.price,
            stock: stock_value(r.stock)?,
            status: r.status,
            description: r.description,
            image: r.image,
            featured: r.featured,
            created_at: r.created_at,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, StoreError> {
    rows.into_iter().map(Product::try_from).collect()
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, price, stock, status,
                   description, image, featured, created_at
            FROM shop.product
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, price, stock, status,
                   description, image, featured, created_at
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn add_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = insert_product(&self.pool, &draft).await?;
        tracing::info!(product_id = %row.id, name = %row.name, "Product added");
        Product::try_from(row)
    }

    async fn add_products(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            rows.push(insert_product(&mut *tx, draft).await?);
        }
        tx.commit().await?;

        tracing::info!(count = rows.len(), "Products added");
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE shop.product
            SET name = $2, category = $3, price = $4, stock = $5, status = $6,
                description = $7, image = $8, featured = $9
            WHERE id = $1
            RETURNING id, name, category, price, stock, status,
                      description, image, featured, created_at
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.price)
        .bind(stock_column(draft.stock))
        .bind(StockStatus::for_stock(draft.stock))
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(draft.featured)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Product::try_from(row)
    }

    async fn toggle_featured(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE shop.product
            SET featured = NOT featured
            WHERE id = $1
            RETURNING id, name, category, price, stock, status,
                      description, image, featured, created_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Product::try_from(row)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

async fn insert_product<'e, E>(executor: E, draft: &ProductDraft) -> Result<ProductRow, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, ProductRow>(
        r"
        INSERT INTO shop.product
            (name, category, price, stock, status, description, image, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, name, category, price, stock, status,
                  description, image, featured, created_at
        ",
    )
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(draft.price)
    .bind(stock_column(draft.stock))
    .bind(StockStatus::for_stock(draft.stock))
    .bind(&draft.description)
    .bind(&draft.image)
    .bind(draft.featured)
    .fetch_one(executor)
    .await
}
