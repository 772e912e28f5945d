//! Collection traits.
//!
//! Listing operations return whole collections; there is no pagination.

use async_trait::async_trait;

use blush_core::{
    Email, NewOrder, NewReview, Order, OrderId, OrderStatus, Product, ProductDraft, ProductId,
    Review, UserId, UserProfile, UserRole,
};

use crate::StoreError;

/// Result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    /// The product after its stock was decremented.
    pub product: Product,
}

/// Account fields for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
}

/// Fields to change on a profile. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// `Some(None)` clears the display name.
    pub display_name: Option<Option<String>>,
    pub email: Option<Email>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, oldest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a product with `created_at` set to now.
    async fn add_product(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// Insert several products as one write: all of them or none.
    async fn add_products(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>, StoreError>;

    /// Overwrite a product, keeping its id and creation time.
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, StoreError>;

    /// Flip the featured flag. No other field is written.
    async fn toggle_featured(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Returns [`StoreError::NotFound`] for an unknown id.
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Decrement stock and record the order as one atomic write.
    ///
    /// The unit price and product name come from the stored product. Fails
    /// with [`StoreError::NotFound`] when the product is gone and
    /// [`StoreError::InsufficientStock`] when it has fewer units than
    /// requested; nothing is written in either case.
    async fn place_order(&self, order: NewOrder) -> Result<PlacedOrder, StoreError>;

    /// Move an order forward. Backward or same-status moves fail with
    /// [`StoreError::InvalidTransition`].
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// All reviews, newest first.
    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError>;

    /// Insert a review with `created_at` set to now.
    async fn add_review(&self, review: NewReview) -> Result<Review, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, StoreError>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Profile and password hash for an email, if the account exists.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(UserProfile, String)>, StoreError>;

    async fn password_hash(&self, id: UserId) -> Result<Option<String>, StoreError>;

    /// Apply all changes at once. Returns [`StoreError::Conflict`] when the
    /// new email belongs to another account.
    async fn update_profile(
        &self,
        id: UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, StoreError>;
}

/// Everything a Blush service needs from persistence.
#[async_trait]
pub trait Store: ProductStore + OrderStore + ReviewStore + UserStore {
    /// Short backend name for logs and health checks.
    fn backend(&self) -> &'static str;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
