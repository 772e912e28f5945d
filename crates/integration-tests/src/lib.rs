//! Integration tests for Blush Cosmetics.
//!
//! Both routers run in-process over one shared [`MemoryStore`], so an order
//! placed through the storefront shows up in the admin console exactly as
//! it would with `PostgreSQL`. Requests go through the full middleware
//! stack with `tower::ServiceExt::oneshot`; [`TestClient`] carries the
//! session cookie between calls.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p blush-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use blush_core::config::Env;
use blush_core::{Price, Product, ProductDraft, UserProfile};
use blush_store::accounts::AccountService;
use blush_store::{MemoryStore, ProductStore, Store};

pub const STOREFRONT_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";
pub const ADMIN_SECRET: &str = "Zq8#vN2$kW5!pR7&tY1*mB4^hJ6%dF3@";

pub const ADMIN_EMAIL: &str = "manager@blush.example";
pub const ADMIN_PASSWORD: &str = "rouge-and-powder";

/// Both services over one store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub storefront: TestClient,
    pub admin: TestClient,
}

impl TestContext {
    /// Free delivery.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delivery_fee("0")
    }

    #[must_use]
    pub fn with_delivery_fee(fee: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();

        let storefront_config = blush_storefront::config::StorefrontConfig::from_vars(
            &Env::from_pairs([
                ("STOREFRONT_STORE", "memory"),
                ("STOREFRONT_BASE_URL", "http://localhost:3000"),
                ("STOREFRONT_SESSION_SECRET", STOREFRONT_SECRET),
                ("STOREFRONT_RATE_LIMIT", "false"),
                ("DELIVERY_FEE", fee),
            ]),
        )
        .expect("storefront config");
        let storefront_sessions = blush_storefront::middleware::create_session_layer(
            tower_sessions::MemoryStore::default(),
            &storefront_config,
        );
        let storefront = blush_storefront::app(
            blush_storefront::state::AppState::new(storefront_config, shared.clone()),
            storefront_sessions,
        );

        let admin_config = blush_admin::config::AdminConfig::from_vars(&Env::from_pairs([
            ("ADMIN_STORE", "memory"),
            ("ADMIN_BASE_URL", "http://localhost:3001"),
            ("ADMIN_SESSION_SECRET", ADMIN_SECRET),
        ]))
        .expect("admin config");
        let admin_sessions = blush_admin::middleware::create_session_layer(
            tower_sessions::MemoryStore::default(),
            &admin_config,
        );
        let admin = blush_admin::app(
            blush_admin::state::AppState::new(admin_config, shared),
            admin_sessions,
        );

        Self {
            store,
            storefront: TestClient::new(storefront),
            admin: TestClient::new(admin),
        }
    }

    /// Insert a product directly into the store.
    pub async fn seed_product(&self, name: &str, category: &str, price: &str, stock: u32) -> Product {
        self.store
            .add_product(ProductDraft {
                name: name.to_owned(),
                category: category.to_owned(),
                price: Price::coerce(price),
                stock,
                description: None,
                image: None,
                featured: false,
            })
            .await
            .expect("seed product")
    }

    /// Create the admin account and sign the admin client in.
    pub async fn sign_in_admin(&mut self) -> UserProfile {
        let admin = AccountService::new(self.store.as_ref())
            .create_admin(ADMIN_EMAIL, ADMIN_PASSWORD, Some("Store Manager".to_owned()))
            .await
            .expect("create admin");

        let response = self
            .admin
            .post(
                "/api/auth/sign-in",
                serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        admin
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, a string for plain text, `Null` when empty.
    pub body: Value,
}

/// A router plus the cookie a browser would hold for it.
#[derive(Clone)]
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&mut self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Forget the session cookie.
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().trim();
            let cleared = pair.ends_with('=') || set_cookie.contains("Max-Age=0");
            self.cookie = (!cleared).then(|| pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
