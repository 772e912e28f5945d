//! Admin console: access control, product management, orders and stats.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use blush_integration_tests::TestContext;
use blush_store::accounts::{AccountService, SignUp};

fn storefront_order(product_id: i32, email: &str, quantity: i64) -> Value {
    json!({
        "product_id": product_id,
        "quantity": quantity,
        "customer_name": "Grace Hopper",
        "customer_email": email,
        "customer_phone": "555-0199",
        "shipping_address": "1 Compiler Way, Arlington"
    })
}

#[tokio::test]
async fn test_console_requires_admin_session() {
    let mut ctx = TestContext::new();

    for uri in ["/api/dashboard", "/api/products", "/api/orders", "/api/reviews", "/api/auth/me"] {
        let response = ctx.admin.get(uri).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.body["error"], "Please sign in");
    }

    let health = ctx.admin.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn test_customer_cannot_sign_in_to_console() {
    let mut ctx = TestContext::new();
    AccountService::new(ctx.store.as_ref())
        .sign_up(SignUp {
            email: "shopper@example.com".to_owned(),
            password: "shopper-pass".to_owned(),
            confirm_password: "shopper-pass".to_owned(),
            display_name: None,
        })
        .await
        .unwrap();

    let response = ctx
        .admin
        .post(
            "/api/auth/sign-in",
            json!({ "email": "shopper@example.com", "password": "shopper-pass" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["field"], "email");

    let me = ctx.admin.get("/api/auth/me").await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_in_and_out() {
    let mut ctx = TestContext::new();
    let admin = ctx.sign_in_admin().await;

    let me = ctx.admin.get("/api/auth/me").await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], admin.email.as_str());
    assert_eq!(me.body["role"], "admin");

    let out = ctx.admin.post_empty("/api/auth/sign-out").await;
    assert_eq!(out.status, StatusCode::NO_CONTENT);

    let me = ctx.admin.get("/api/auth/me").await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let mut ctx = TestContext::new();
    ctx.sign_in_admin().await;

    let created = ctx
        .admin
        .post(
            "/api/products",
            json!({
                "name": "  Velvet Matte Lipstick ",
                "category": "Lips",
                "price": "24.00",
                "stock": "40",
                "description": "",
                "featured": false
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["message"], "Product added successfully!");
    assert_eq!(created.body["product"]["name"], "Velvet Matte Lipstick");
    assert_eq!(created.body["product"]["price"], "24.00");
    assert_eq!(created.body["product"]["stock"], 40);
    assert_eq!(created.body["product"]["status"], "In Stock");
    assert_eq!(created.body["product"]["description"], Value::Null);
    let id = created.body["product"]["id"].as_i64().unwrap();

    let updated = ctx
        .admin
        .put(
            &format!("/api/products/{id}"),
            json!({ "name": "Velvet Matte Lipstick", "category": "Lips", "price": 26, "stock": 8 }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["message"], "Product updated successfully!");
    assert_eq!(updated.body["product"]["stock"], 8);
    assert_eq!(updated.body["product"]["status"], "Low Stock");

    let toggled = ctx
        .admin
        .post_empty(&format!("/api/products/{id}/featured"))
        .await;
    assert_eq!(toggled.body["message"], "Product updated!");
    assert_eq!(toggled.body["product"]["featured"], true);

    let low = ctx.admin.get("/api/products?low_stock=true").await;
    assert_eq!(low.body.as_array().unwrap().len(), 1);

    let categories = ctx.admin.get("/api/categories").await;
    assert_eq!(categories.body, json!(["Lips"]));

    let deleted = ctx.admin.delete(&format!("/api/products/{id}")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Product deleted successfully!");

    let missing = ctx
        .admin
        .put(
            &format!("/api/products/{id}"),
            json!({ "name": "Ghost", "category": "Lips", "price": 1, "stock": 1 }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], "Product not found");
}

#[tokio::test]
async fn test_product_form_validation() {
    let mut ctx = TestContext::new();
    ctx.sign_in_admin().await;

    let blank_name = ctx
        .admin
        .post(
            "/api/products",
            json!({ "name": "   ", "category": "Face", "price": "12", "stock": 3 }),
        )
        .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank_name.body["error"], "Name is required");

    let junk_numbers = ctx
        .admin
        .post(
            "/api/products",
            json!({ "name": "Setting Spray", "category": "Face", "price": "abc", "stock": "-4" }),
        )
        .await;
    assert_eq!(junk_numbers.status, StatusCode::CREATED);
    assert_eq!(junk_numbers.body["product"]["price"], "0");
    assert_eq!(junk_numbers.body["product"]["stock"], 0);
    assert_eq!(junk_numbers.body["product"]["status"], "Out of Stock");

    let oversize = ctx
        .admin
        .post(
            "/api/products",
            json!({ "name": "Gold Leaf Palette", "category": "Eyes", "price": "79228162514264337593543950335", "stock": 1 }),
        )
        .await;
    assert_eq!(oversize.status, StatusCode::CREATED);
    assert_eq!(oversize.body["product"]["price"], "9999999999.99");

    let sub_cent = ctx
        .admin
        .post(
            "/api/products",
            json!({ "name": "Lip Oil", "category": "Lips", "price": 12.345, "stock": 1 }),
        )
        .await;
    assert_eq!(sub_cent.body["product"]["price"], "12.35");
}

#[tokio::test]
async fn test_orders_hide_deleted_products() {
    let mut ctx = TestContext::new();
    let kept = ctx.seed_product("Brow Gel", "Eyes", "9.00", 30).await;
    let dropped = ctx.seed_product("Glitter Liner", "Eyes", "7.00", 30).await;

    for (product, email) in [(&kept, "a@example.com"), (&dropped, "b@example.com")] {
        let placed = ctx
            .storefront
            .post("/api/orders", storefront_order(product.id.as_i32(), email, 2))
            .await;
        assert_eq!(placed.status, StatusCode::CREATED, "{}", placed.body);
    }

    ctx.sign_in_admin().await;
    ctx.admin
        .delete(&format!("/api/products/{}", dropped.id.as_i32()))
        .await;

    let visible = ctx.admin.get("/api/orders").await;
    let rows = visible.body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().unwrap()["product_name"], "Brow Gel");
    assert_eq!(rows.first().unwrap()["orphaned"], false);

    let all = ctx.admin.get("/api/orders?include_orphaned=true").await;
    let rows = all.body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|row| row["orphaned"] == true));

    let stats = ctx.admin.get("/api/dashboard").await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["total_orders"], 2);
    assert_eq!(stats.body["pending_orders"], 2);
    assert_eq!(stats.body["total_sales"], "32.00");
    assert_eq!(stats.body["total_products"], 1);
    assert_eq!(stats.body["total_customers"], 2);
    assert_eq!(stats.body["orphaned_orders"], 1);
}

#[tokio::test]
async fn test_order_status_moves_forward_only() {
    let mut ctx = TestContext::new();
    let product = ctx.seed_product("Primer", "Face", "18.00", 50).await;
    let placed = ctx
        .storefront
        .post("/api/orders", storefront_order(product.id.as_i32(), "c@example.com", 1))
        .await;
    let order_id = placed.body["order"]["id"].as_i64().unwrap();

    ctx.sign_in_admin().await;
    let uri = format!("/api/orders/{order_id}/status");

    let shipped = ctx.admin.post(&uri, json!({ "status": "Shipped" })).await;
    assert_eq!(shipped.status, StatusCode::OK, "{}", shipped.body);
    assert_eq!(shipped.body["status"], "Shipped");

    let backwards = ctx.admin.post(&uri, json!({ "status": "Pending" })).await;
    assert_eq!(backwards.status, StatusCode::CONFLICT);
    assert_eq!(
        backwards.body["error"],
        "order status cannot change from Shipped to Pending"
    );

    let unknown = ctx
        .admin
        .post("/api/orders/999999/status", json!({ "status": "Delivered" }))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body["error"], "Order not found");
}

#[tokio::test]
async fn test_reviews_listed_for_admins() {
    let mut ctx = TestContext::new();
    let review = ctx
        .storefront
        .post(
            "/api/reviews",
            json!({ "name": "Jo", "email": "jo@example.com", "rating": 5, "comment": "Lovely shade" }),
        )
        .await;
    assert_eq!(review.status, StatusCode::CREATED, "{}", review.body);

    ctx.sign_in_admin().await;
    let listed = ctx.admin.get("/api/reviews").await;
    assert_eq!(listed.status, StatusCode::OK);
    let reviews = listed.body.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews.first().unwrap()["comment"], "Lovely shade");
}
