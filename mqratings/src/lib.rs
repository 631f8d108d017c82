//! # mqratings - Certification systems and rating severity
//!
//! This crate models film certification ratings for the pre-show engine:
//! - A static registry of certification systems (MPAA, BBFC, FSK), each one
//!   an ordered list of ratings from mildest to most severe
//! - Parsing of `"SYSTEM:NAME"` rating strings (the form stored in feature
//!   records and watched ledgers)
//! - Ordinal severity comparison, used to band trailers against the
//!   ratings of the features scheduled in a run
//!
//! # Example
//!
//! ```
//! use mqratings::Rating;
//!
//! let r = Rating::parse("MPAA:PG-13")?;
//! assert_eq!(r.to_string(), "MPAA:PG-13");
//!
//! let max = Rating::parse("MPAA:R")?;
//! assert!(r.cmp_severity(&max).is_le());
//! # Ok::<(), mqratings::Error>(())
//! ```

mod error;
mod rating;
mod system;

pub use error::{Error, Result};
pub use rating::Rating;
pub use system::{system, systems, RatingSystem};
