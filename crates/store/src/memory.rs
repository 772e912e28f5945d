//! In-process store for tests and local development.
//!
//! All collections sit behind one mutex, so order placement (read stock,
//! decrement, insert order) happens in a single critical section.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use blush_core::{
    Email, NewOrder, NewReview, Order, OrderId, OrderStatus, Product, ProductDraft, ProductId,
    Review, ReviewId, UserId, UserProfile, take_stock,
};

use crate::{
    NewUser, OrderStore, PlacedOrder, ProductStore, ProfileChanges, ReviewStore, Store,
    StoreError, UserStore,
};

#[derive(Default)]
struct Collections {
    products: Vec<Product>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    users: Vec<(UserProfile, String)>,
    next_id: i32,
}

impl Collections {
    const fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn product_mut(&mut self, id: ProductId) -> Result<&mut Product, StoreError> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut (UserProfile, String), StoreError> {
        self.users
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(StoreError::NotFound)
    }

    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|(u, _)| &u.email == email && Some(u.id) != except)
    }
}

/// Process-local [`Store`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn lock(&self) -> Result<tokio::sync::MutexGuard<'_, Collections>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.inner.lock().await)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.lock().await?.products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self
            .lock()
            .await?
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn add_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut db = self.lock().await?;
        let id = ProductId::new(db.next_id());
        let product = Product::from_draft(id, draft, Utc::now());
        db.products.push(product.clone());
        Ok(product)
    }

    async fn add_products(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>, StoreError> {
        let mut db = self.lock().await?;
        let now = Utc::now();
        let added: Vec<Product> = drafts
            .into_iter()
            .map(|draft| Product::from_draft(ProductId::new(db.next_id()), draft, now))
            .collect();
        db.products.extend(added.iter().cloned());
        Ok(added)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, StoreError> {
        let mut db = self.lock().await?;
        let product = db.product_mut(id)?;
        product.apply(draft);
        Ok(product.clone())
    }

    async fn toggle_featured(&self, id: ProductId) -> Result<Product, StoreError> {
        let mut db = self.lock().await?;
        let product = db.product_mut(id)?;
        product.featured = !product.featured;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut db = self.lock().await?;
        let before = db.products.len();
        db.products.retain(|p| p.id != id);
        if db.products.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.lock().await?.orders.clone();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .lock()
            .await?
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn place_order(&self, order: NewOrder) -> Result<PlacedOrder, StoreError> {
        let mut db = self.lock().await?;

        // Every check runs before stock is touched. A failed placement
        // only burns an id, as a rolled-back SERIAL would.
        let snapshot = db.product_mut(order.product_id)?.clone();
        let remaining = take_stock(snapshot.stock, order.quantity)?;
        let id = OrderId::new(db.next_id());
        let order = Order::placed(id, order, snapshot.name, snapshot.price, Utc::now())?;

        let product = db.product_mut(order.product_id)?;
        product.set_stock(remaining);
        let product = product.clone();
        db.orders.push(order.clone());

        Ok(PlacedOrder { order, product })
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut db = self.lock().await?;
        let order = db
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        if !order.status.can_advance_to(status) {
            return Err(StoreError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        Ok(order.clone())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let mut reviews = self.lock().await?.reviews.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn add_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut db = self.lock().await?;
        let id = ReviewId::new(db.next_id());
        let review = Review::from_new(id, review, Utc::now());
        db.reviews.push(review.clone());
        Ok(review)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, StoreError> {
        let mut db = self.lock().await?;
        if db.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }
        let profile = UserProfile {
            id: UserId::new(db.next_id()),
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: Utc::now(),
        };
        db.users.push((profile.clone(), user.password_hash));
        Ok(profile)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .lock()
            .await?
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(UserProfile, String)>, StoreError> {
        Ok(self
            .lock()
            .await?
            .users
            .iter()
            .find(|(u, _)| &u.email == email)
            .cloned())
    }

    async fn password_hash(&self, id: UserId) -> Result<Option<String>, StoreError> {
        Ok(self
            .lock()
            .await?
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn update_profile(
        &self,
        id: UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, StoreError> {
        let mut db = self.lock().await?;
        if let Some(email) = &changes.email
            && db.email_taken(email, Some(id))
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }
        let (profile, hash) = db.user_mut(id)?;
        if let Some(display_name) = changes.display_name {
            profile.display_name = display_name;
        }
        if let Some(email) = changes.email {
            profile.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        Ok(profile.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().await.map(|_| ())
    }
}
