//! Core rules for the EsTuPiso roommate and rental platform.
//!
//! The crate hosts the compatibility engine used to rank people and listings, and the
//! bidirectional review rules that decide when a rating may be submitted or read. Both are
//! pure over in-memory records; persistence sits behind the [`reviews::RatingRepository`]
//! seam.

pub mod config;
pub mod domain;
pub mod error;
pub mod matching;
pub mod reviews;
pub mod telemetry;
