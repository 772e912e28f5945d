//! Order placement through the storefront router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use blush_integration_tests::TestContext;
use blush_store::{OrderStore, ProductStore};

fn order(product_id: i32, quantity: i64) -> Value {
    json!({
        "product_id": product_id,
        "quantity": quantity,
        "customer_name": "Ada Lovelace",
        "customer_email": "ada@example.com",
        "customer_phone": "555-0100",
        "shipping_address": "12 Analytical Row, London"
    })
}

#[tokio::test]
async fn test_order_decrements_stock_and_rederives_status() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Lip Tint", "Lips", "10.00", 5).await;

    let response = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 3))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["message"], "Order placed successfully!");
    assert_eq!(response.body["order"]["total_amount"], "30.00");
    assert_eq!(response.body["order"]["status"], "Pending");
    assert_eq!(response.body["order"]["product_name"], "Lip Tint");
    assert_eq!(response.body["product"]["stock"], 2);
    assert_eq!(response.body["product"]["status"], "Low Stock");

    let stored = ctx.store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 2);
}

#[tokio::test]
async fn test_out_of_stock_rejected_and_nothing_written() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Cream Blush", "Face", "16.00", 0).await;

    let response = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 1))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "Only 0 items available in stock");
    assert!(ctx.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quantity_above_stock_rejected() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Kohl Pencil", "Eyes", "7.00", 4).await;

    let response = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 5))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "Only 4 items available in stock");
    assert_eq!(
        ctx.store.get_product(product.id).await.unwrap().unwrap().stock,
        4
    );
}

#[tokio::test]
async fn test_form_validation_messages() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Setting Powder", "Face", "20.00", 50).await;
    let id = product.id.as_i32();

    let mut blank_address = order(id, 1);
    blank_address["shipping_address"] = json!("   ");
    let response = ctx.storefront.post("/api/orders", blank_address).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Shipping address is required");

    let mut bad_email = order(id, 1);
    bad_email["customer_email"] = json!("not-an-email");
    let response = ctx.storefront.post("/api/orders", bad_email).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.storefront.post("/api/orders", order(id, 0)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.storefront.post("/api/orders", order(9999, 1)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    assert!(ctx.store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delivery_fee_added_to_total() {
    let mut ctx = TestContext::with_delivery_fee("4.99");
    let product = ctx.seed_product("Brow Gel", "Eyes", "11.00", 30).await;

    let response = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 2))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["order"]["total_amount"], "26.99");
    assert_eq!(response.body["order"]["delivery_fee"], "4.99");
}

#[tokio::test]
async fn test_duplicate_submit_creates_two_orders() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Lip Oil", "Lips", "14.00", 30).await;

    for _ in 0..2 {
        let response = ctx
            .storefront
            .post("/api/orders", order(product.id.as_i32(), 1))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    assert_eq!(ctx.store.list_orders().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_orders_never_oversell() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Limited Palette", "Eyes", "45.00", 5).await;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let mut client = ctx.storefront.clone();
        let body = order(product.id.as_i32(), 1);
        handles.push(tokio::spawn(async move {
            client.post("/api/orders", body).await.status
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(created, 5);
    assert_eq!(conflicts, 7);
    let stored = ctx.store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 0);
    assert_eq!(stored.status.label(), "Out of Stock");
    assert_eq!(ctx.store.list_orders().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_total_too_large_is_rejected_without_touching_stock() {
    let mut ctx = TestContext::new();
    let product = ctx
        .seed_product("Gold Leaf Palette", "Eyes", "79228162514264337593543950335", 10)
        .await;

    let response = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 2))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.body);
    assert_eq!(response.body["error"], "Order total is too large");

    let stored = ctx.store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 10);
    assert!(ctx.store.list_orders().await.unwrap().is_empty());

    let single = ctx
        .storefront
        .post("/api/orders", order(product.id.as_i32(), 1))
        .await;
    assert_eq!(single.status, StatusCode::CREATED, "{}", single.body);
    assert_eq!(single.body["order"]["total_amount"], "9999999999.99");
}
