use async_trait::async_trait;
use chrono::{DateTime, Utc};

use blush_core::{NewReview, Rating, Review, ReviewId};

use super::PgStore;
use crate::{ReviewStore, StoreError};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    rating: i16,
    comment: String,
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = StoreError;

    fn try_from(r: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(r.rating)
            .ok()
            .and_then(|stars| Rating::new(stars).ok())
            .ok_or_else(|| {
                StoreError::DataCorruption(format!("review {} rating {}", r.id, r.rating))
            })?;

        Ok(Self {
            id: r.id,
            rating,
            comment: r.comment,
            name: r.name,
            email: r.email,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, rating, comment, name, email, created_at
            FROM shop.review
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    async fn add_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO shop.review (rating, comment, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, rating, comment, name, email, created_at
            ",
        )
        .bind(i16::from(review.rating.stars()))
        .bind(&review.comment)
        .bind(&review.name)
        .bind(&review.email)
        .fetch_one(&self.pool)
        .await?;

        Review::try_from(row)
    }
}
