//! Coverage Classification
//!
//! Given the evidence tasks already collected for one or more frameworks,
//! determine how much of another framework is covered.
//!
//! # Usage
//!
//! ```ignore
//! use crosswalk::coverage::{classify, implemented_union};
//!
//! let implemented = implemented_union([nist, soc2]);
//! let result = classify(&implemented, iso);
//! println!("{}", result.summary());
//! ```

mod classifier;
mod comparison;
mod ratio;

pub use classifier::{
    classify, implemented_union, ClassificationResult, CoverageStatus, ImplementedSet,
};
pub use comparison::{compare, cross_compare, Comparison};
pub use ratio::{coverage_ratio, CoverageSummary, Percentage};
