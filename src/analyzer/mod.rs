//! Pure, synchronous analysis steps.
//!
//! Nothing in here performs I/O:
//!
//! - [`normalize`] strips range operators from a declared version
//! - [`TyposquatDetector`] flags names that are near misses of trusted packages
//! - [`classify`] folds both risk signals into a [`PackageStatus`](crate::model::PackageStatus)

mod classify;
mod typosquat;
mod version;

pub use classify::classify;
pub use typosquat::{TyposquatDetector, MAX_DISTANCE, MIN_TARGET_LEN, POPULAR_PACKAGES};
pub use version::normalize;
