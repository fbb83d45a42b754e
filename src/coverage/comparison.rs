//! Framework-to-framework comparisons
//!
//! A comparison answers "if the evidence for these frameworks is already
//! collected, how much of that framework is covered?".

use serde::{Deserialize, Serialize};

use super::classifier::{classify, implemented_union, ClassificationResult};
use super::ratio::CoverageSummary;
use crate::error::Result;
use crate::framework::{Framework, FrameworkSet};

/// Classification of a target framework against implemented frameworks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Labels of the frameworks whose evidence counts as implemented
    pub implemented: Vec<String>,

    /// Label of the framework being investigated
    pub target: String,

    /// Distinct evidence tasks in the implemented set
    pub implemented_tasks: usize,

    /// Per-control outcome
    pub result: ClassificationResult,
}

impl Comparison {
    /// Short description such as `"SOC 2 to ISO 27001"`
    pub fn title(&self) -> String {
        format!("{} to {}", self.implemented.join(" + "), self.target)
    }

    /// Counts and percentage
    pub fn summary(&self) -> CoverageSummary {
        self.result.summary()
    }
}

/// Classify `target` against the union of `implemented` frameworks' evidence
pub fn compare(implemented: &[&Framework], target: &Framework) -> Comparison {
    let tasks = implemented_union(implemented.iter().copied());
    Comparison {
        implemented: implemented.iter().map(|f| f.label().to_string()).collect(),
        target: target.label().to_string(),
        implemented_tasks: tasks.len(),
        result: classify(&tasks, target),
    }
}

/// Compare in both directions: `a` against `b`, then `b` against `a`
pub fn cross_compare(a: &Framework, b: &Framework) -> (Comparison, Comparison) {
    (compare(&[a], b), compare(&[b], a))
}

impl FrameworkSet {
    /// Compare frameworks by label
    ///
    /// Fails with [`crate::Error::UnknownFramework`] naming the first label
    /// that does not exist.
    pub fn compare<S: AsRef<str>>(&self, implemented: &[S], target: &str) -> Result<Comparison> {
        let sources = self.get_all(implemented)?;
        let target = self.get(target)?;
        Ok(compare(&sources, target))
    }

    /// Compare two frameworks by label in both directions
    pub fn cross_compare(&self, a: &str, b: &str) -> Result<(Comparison, Comparison)> {
        Ok(cross_compare(self.get(a)?, self.get(b)?))
    }
}
