//! Rating aggregation.

use serde::{Deserialize, Serialize};

/// Denormalized rating stored on a book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RatingSummary {
    /// Mean rating rounded to two decimals; 0 with no reviews.
    pub average: f64,
    /// Number of reviews.
    pub count: i64,
}

impl RatingSummary {
    /// Aggregate a book's review ratings.
    ///
    /// ```
    /// use nest_commerce::review::RatingSummary;
    /// let summary = RatingSummary::from_ratings([5, 4, 4]);
    /// assert_eq!(summary.average, 4.33);
    /// assert_eq!(summary.count, 3);
    /// ```
    pub fn from_ratings(ratings: impl IntoIterator<Item = i64>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), r| (sum + r, count + 1));
        if count == 0 {
            return Self::default();
        }
        Self {
            average: round2(sum as f64 / count as f64),
            count,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
