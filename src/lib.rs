//! # Crosswalk
//!
//! Evidence-task coverage analysis across compliance frameworks.
//!
//! Compliance programs map each framework control (SOC 2 `CC6.1`, ISO 27001
//! `A.9.2.1`, NIST CSF `PR.AC-1`, ...) to the evidence tasks that satisfy
//! it. Many evidence tasks are shared between frameworks, so evidence
//! collected for one audit often covers a large part of the next. This crate
//! measures that overlap.
//!
//! ## Features
//!
//! - **Framework building**: from a wide evidence export (one column per
//!   framework) or from a control catalog joined with an evidence catalog
//! - **Category filtering**: restrict an analysis to rows tagged with one
//!   code (e.g., a single Trust Services Criteria group)
//! - **Coverage classification**: collected / partially collected /
//!   outstanding, against evidence implemented for one or more frameworks
//!
//! ## Quick Start
//!
//! ```ignore
//! use crosswalk::builder::WideTableBuilder;
//!
//! let frameworks = WideTableBuilder::new(4).build(&header, &rows)?;
//! let comparison = frameworks.compare(&["SOC 2"], "ISO 27001")?;
//!
//! println!("{}", comparison.title());
//! println!("{}", comparison.summary());
//! ```
//!
//! Reading files and rendering reports is left to the caller; everything in
//! this crate works on in-memory rows of strings.

pub mod builder;
pub mod coverage;
mod error;
mod framework;

pub use builder::{
    build_from_joined_catalogs, build_from_wide_table, CatalogBuilder, CatalogLayout,
    CategoryFilter, JoinStats, WideTableBuilder,
};
pub use coverage::{
    classify, compare, coverage_ratio, cross_compare, implemented_union, ClassificationResult,
    Comparison, CoverageStatus, CoverageSummary, ImplementedSet, Percentage,
};
pub use error::{Error, Result};
pub use framework::{Control, EvidenceTaskId, Framework, FrameworkSet};
