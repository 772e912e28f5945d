//! Business logic behind the storefront routes.
//!
//! Each service borrows the injected [`blush_store::Store`] for the length
//! of one request and maps store failures to the notification a customer
//! would see.

pub mod catalog;
pub mod ordering;
pub mod reviews;

pub use catalog::CatalogService;
pub use ordering::OrderingService;
pub use reviews::ReviewService;
