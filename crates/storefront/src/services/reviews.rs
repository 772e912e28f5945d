//! Review submission and listing.

use blush_core::{Review, ReviewRequest};
use blush_store::Store;

use crate::error::{AppError, Result};

pub struct ReviewService<'a> {
    store: &'a dyn Store,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Validate and store a review, stamped with the current time.
    ///
    /// # Errors
    ///
    /// [`AppError::Review`] for a missing field or a rating outside 1 to 5.
    pub async fn submit(&self, request: ReviewRequest) -> Result<Review> {
        let review = request.validate()?;
        let review = self
            .store
            .add_review(review)
            .await
            .map_err(AppError::store("Something went wrong"))?;
        tracing::info!(review_id = %review.id, rating = review.rating.stars(), "Review submitted");
        Ok(review)
    }

    /// All reviews, newest first.
    ///
    /// # Errors
    ///
    /// "Failed to load reviews" when the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Review>> {
        self.store
            .list_reviews()
            .await
            .map_err(AppError::store("Failed to load reviews"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use blush_core::ReviewError;
    use blush_store::MemoryStore;

    use super::*;

    fn request(rating: i64, comment: &str, name: &str) -> ReviewRequest {
        ReviewRequest {
            rating,
            comment: comment.to_owned(),
            name: name.to_owned(),
            email: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_submit_then_list_newest_first() {
        let store = MemoryStore::new();
        let reviews = ReviewService::new(&store);

        reviews.submit(request(4, "Lovely shade", "Mia")).await.unwrap();
        let second = reviews.submit(request(5, "Holy grail", "Noor")).await.unwrap();
        assert_eq!(second.email, None);

        let listed = reviews.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.first().unwrap().name, "Noor");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let store = MemoryStore::new();
        let err = ReviewService::new(&store)
            .submit(request(0, "Nice", "Mia"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Review(ReviewError::MissingFields)));
        assert!(ReviewService::new(&store).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_format_not_checked() {
        let store = MemoryStore::new();
        let mut form = request(3, "Fine", "Sam");
        form.email = Some("not-an-email".to_owned());
        let review = ReviewService::new(&store).submit(form).await.unwrap();
        assert_eq!(review.email.as_deref(), Some("not-an-email"));
    }
}
