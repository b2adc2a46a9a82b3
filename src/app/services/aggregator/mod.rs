//! Cross-feed aggregation
//!
//! Joins the three keyed collections into one de-identified record per
//! patient of the opinion feed.
//!
//! ## Architecture
//!
//! - [`join`] - Join driver iterating the opinion collection
//! - [`deidentify`] - Patient id permutation and birth date perturbation
//!
//! ## Lookup asymmetry
//!
//! The imaging lookup through the first opinion report's join id must
//! succeed, otherwise the run fails with [`crate::Error::Lookup`]. The
//! pathology lookup by patient id is optional and yields `None` when absent.
//!
//! ## Usage
//!
//! ```rust
//! use radiology_extractor::app::services::aggregator::Aggregator;
//! use radiology_extractor::KeyedRecords;
//!
//! # fn example() -> radiology_extractor::Result<()> {
//! let mut aggregator = Aggregator::seeded(42);
//! let records = aggregator.aggregate(
//!     &KeyedRecords::new(),
//!     &KeyedRecords::new(),
//!     &KeyedRecords::new(),
//! )?;
//! assert!(records.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod deidentify;
pub mod join;

#[cfg(test)]
pub mod tests;

pub use deidentify::{deidentify_id, perturb_birth_date};
pub use join::Aggregator;
