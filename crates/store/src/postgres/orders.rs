use async_trait::async_trait;
use chrono::{DateTime, Utc};

use blush_core::order::order_total;
use blush_core::{
    Email, NewOrder, Order, OrderId, OrderStatus, Price, Product, ProductId, Quantity, take_stock,
};

use super::products::ProductRow;
use super::{PgStore, stock_column};
use crate::{OrderStore, PlacedOrder, StoreError};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_name: String,
    customer_email: Email,
    customer_phone: String,
    shipping_address: String,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Price,
    delivery_fee: Price,
    total_amount: Price,
    order_date: DateTime<Utc>,
    status: OrderStatus,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::from_signed(i64::from(r.quantity)).map_err(|e| {
            StoreError::DataCorruption(format!("order {} quantity {}: {e}", r.id, r.quantity))
        })?;

        Ok(Self {
            id: r.id,
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            customer_phone: r.customer_phone,
            shipping_address: r.shipping_address,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity,
            unit_price: r.unit_price,
            delivery_fee: r.delivery_fee,
            total_amount: r.total_amount,
            order_date: r.order_date,
            status: r.status,
        })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone, shipping_address,
                   product_id, product_name, quantity, unit_price, delivery_fee,
                   total_amount, order_date, status
            FROM shop."order"
            ORDER BY order_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, customer_name, customer_email, customer_phone, shipping_address,
                   product_id, product_name, quantity, unit_price, delivery_fee,
                   total_amount, order_date, status
            FROM shop."order"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    async fn place_order(&self, order: NewOrder) -> Result<PlacedOrder, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock: a concurrent placement for the same product waits here
        // and then sees the decremented stock.
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, category, price, stock, status,
                   description, image, featured, created_at
            FROM shop.product
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(order.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        let mut product = Product::try_from(row)?;
        let remaining = take_stock(product.stock, order.quantity)?;
        let total = order_total(product.price, order.quantity, order.delivery_fee)?;
        product.set_stock(remaining);

        sqlx::query("UPDATE shop.product SET stock = $2, status = $3 WHERE id = $1")
            .bind(product.id)
            .bind(stock_column(product.stock))
            .bind(product.status)
            .execute(&mut *tx)
            .await?;

        let quantity = i32::try_from(order.quantity.get())
            .map_err(|_| StoreError::DataCorruption("quantity exceeds column range".to_owned()))?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO shop."order"
                (customer_name, customer_email, customer_phone, shipping_address,
                 product_id, product_name, quantity, unit_price, delivery_fee, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, customer_name, customer_email, customer_phone, shipping_address,
                      product_id, product_name, quantity, unit_price, delivery_fee,
                      total_amount, order_date, status
            "#,
        )
        .bind(&order.customer.name)
        .bind(&order.customer.email)
        .bind(&order.customer.phone)
        .bind(&order.shipping_address)
        .bind(product.id)
        .bind(&product.name)
        .bind(quantity)
        .bind(product.price)
        .bind(order.delivery_fee)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let order = Order::try_from(row)?;
        Ok(PlacedOrder { order, product })
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, OrderStatus>(
            r#"SELECT status FROM shop."order" WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound)?;

        if !current.can_advance_to(status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE shop."order"
            SET status = $2
            WHERE id = $1
            RETURNING id, customer_name, customer_email, customer_phone, shipping_address,
                      product_id, product_name, quantity, unit_price, delivery_fee,
                      total_amount, order_date, status
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Order::try_from(row)
    }
}
