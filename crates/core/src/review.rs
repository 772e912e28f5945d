//! Customer reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ReviewId;

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidRating`] outside `1..=5`.
    pub const fn new(stars: u8) -> Result<Self, ReviewError> {
        if stars >= Self::MIN && stars <= Self::MAX {
            Ok(Self(stars))
        } else {
            Err(ReviewError::InvalidRating)
        }
    }

    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Please fill required fields")]
    MissingFields,
    #[error("Rating must be between 1 and 5")]
    InvalidRating,
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub rating: Rating,
    pub comment: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    /// Zero (or missing) means the customer picked no stars.
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A validated review ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: Rating,
    pub comment: String,
    pub name: String,
    pub email: Option<String>,
}

impl ReviewRequest {
    /// Rating, comment and name are required. Email is optional and kept
    /// as typed.
    ///
    /// # Errors
    ///
    /// [`ReviewError::MissingFields`] when any required field is blank,
    /// [`ReviewError::InvalidRating`] for a rating above 5 or below 0.
    pub fn validate(self) -> Result<NewReview, ReviewError> {
        let comment = self.comment.trim();
        let name = self.name.trim();
        if self.rating == 0 || comment.is_empty() || name.is_empty() {
            return Err(ReviewError::MissingFields);
        }
        let stars = u8::try_from(self.rating).map_err(|_| ReviewError::InvalidRating)?;

        Ok(NewReview {
            rating: Rating::new(stars)?,
            comment: comment.to_owned(),
            name: name.to_owned(),
            email: self
                .email
                .map(|e| e.trim().to_owned())
                .filter(|e| !e.is_empty()),
        })
    }
}

impl Review {
    #[must_use]
    pub fn from_new(id: ReviewId, new: NewReview, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            rating: new.rating,
            comment: new.comment,
            name: new.name,
            email: new.email,
            created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(rating: i64) -> ReviewRequest {
        ReviewRequest {
            rating,
            comment: "Lovely texture".to_owned(),
            name: "Sam".to_owned(),
            email: Some("  ".to_owned()),
        }
    }

    #[test]
    fn test_valid_review() {
        let review = request(5).validate().unwrap();
        assert_eq!(review.rating.stars(), 5);
        assert_eq!(review.email, None);
    }

    #[test]
    fn test_email_is_not_format_checked() {
        let mut req = request(4);
        req.email = Some("whatever".to_owned());
        assert_eq!(req.validate().unwrap().email.as_deref(), Some("whatever"));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(request(0).validate(), Err(ReviewError::MissingFields));

        let mut req = request(3);
        req.name = " ".to_owned();
        assert_eq!(req.validate(), Err(ReviewError::MissingFields));
    }

    #[test]
    fn test_rating_out_of_range() {
        assert_eq!(request(6).validate(), Err(ReviewError::InvalidRating));
        assert_eq!(request(-1).validate(), Err(ReviewError::InvalidRating));
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}
