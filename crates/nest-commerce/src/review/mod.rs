//! Reviews and the rating rollup they feed.

mod rating;
mod review;

pub use rating::RatingSummary;
pub use review::{Review, ReviewDraft, ReviewUpdate, MAX_RATING, MIN_RATING};
