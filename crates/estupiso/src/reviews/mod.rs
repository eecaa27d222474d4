//! Bidirectional review rules.
//!
//! A rating is readable by its target only once the target has rated the author back, and
//! the same rater may not rate the same ratee again until the cooldown has elapsed.

pub mod domain;
mod eligibility;
pub mod repository;
pub mod router;
pub mod service;
mod visibility;

#[cfg(test)]
mod tests;

pub use domain::{Rating, RatingScore, RatingSubmission};
pub use eligibility::{
    can_rate, submit_rating, CooldownPolicy, MonthArithmetic, ReviewError,
    DEFAULT_COOLDOWN_MONTHS,
};
pub use repository::{RatingRepository, RepositoryError};
pub use router::review_router;
pub use service::{ReceivedReviews, ReviewService, ReviewServiceError};
pub use visibility::{is_visible_to, pending_notifications, visible_reviews, ReviewSummary};
