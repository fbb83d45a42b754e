//! Three-way control classification
//!
//! A control is **collected** when every evidence task it requires is in the
//! implemented set, **partial** when only some are, and **outstanding** when
//! none are. A control with no evidence tasks is collected: "every task is
//! implemented" holds vacuously. Such controls are also listed in
//! [`ClassificationResult::unmapped`] so reports can call them out, since an
//! empty mapping may mean "not yet mapped" rather than "satisfied".

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ratio::{coverage_ratio, CoverageSummary};
use crate::error::Result;
use crate::framework::{Control, EvidenceTaskId, Framework};

/// Evidence task ids already gathered, sorted for stable output
pub type ImplementedSet = BTreeSet<EvidenceTaskId>;

/// Coverage state of a single control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// All required evidence is implemented
    Collected,
    /// Some required evidence is implemented
    Partial,
    /// No required evidence is implemented
    Outstanding,
}

impl CoverageStatus {
    /// All states in report order
    pub const ALL: [CoverageStatus; 3] = [Self::Collected, Self::Partial, Self::Outstanding];

    /// Legend name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Collected => "Collected",
            Self::Partial => "Partially Collected",
            Self::Outstanding => "Outstanding",
        }
    }

    /// Section heading in breakdown reports
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Collected => "Collected Controls",
            Self::Partial => "Partially Collected Controls",
            Self::Outstanding => "Outstanding Controls",
        }
    }

    /// Classify one control's evidence list against `implemented`
    pub fn of(tasks: &[EvidenceTaskId], implemented: &ImplementedSet) -> Self {
        let mut found = 0usize;
        for task in tasks {
            if implemented.contains(task) {
                found += 1;
            }
        }
        if found == tasks.len() {
            Self::Collected
        } else if found > 0 {
            Self::Partial
        } else {
            Self::Outstanding
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Partition of a framework's controls by coverage state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Controls whose evidence is fully implemented
    pub collected: Vec<Control>,

    /// Controls whose evidence is partly implemented
    pub partial: Vec<Control>,

    /// Controls with no implemented evidence
    pub outstanding: Vec<Control>,

    /// Collected controls that have no evidence mapped at all
    pub unmapped: Vec<Control>,
}

impl ClassificationResult {
    /// Controls in one state, in framework order
    pub fn controls(&self, status: CoverageStatus) -> &[Control] {
        match status {
            CoverageStatus::Collected => &self.collected,
            CoverageStatus::Partial => &self.partial,
            CoverageStatus::Outstanding => &self.outstanding,
        }
    }

    /// Number of controls in one state
    pub fn count(&self, status: CoverageStatus) -> usize {
        self.controls(status).len()
    }

    /// Number of controls classified
    pub fn total(&self) -> usize {
        self.collected.len() + self.partial.len() + self.outstanding.len()
    }

    /// State of a control, `None` if the control was not classified
    pub fn status_of(&self, control: &str) -> Option<CoverageStatus> {
        CoverageStatus::ALL
            .into_iter()
            .find(|status| self.controls(*status).iter().any(|c| c == control))
    }

    /// Fraction of controls collected
    pub fn coverage_ratio(&self) -> Result<f64> {
        coverage_ratio(self)
    }

    /// Counts and percentage for display
    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary::from_result(self)
    }
}

/// Classify every control of `target` against `implemented`
pub fn classify(implemented: &ImplementedSet, target: &Framework) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for (control, tasks) in target.controls() {
        let status = CoverageStatus::of(tasks, implemented);
        match status {
            CoverageStatus::Collected => {
                if tasks.is_empty() {
                    result.unmapped.push(control.clone());
                }
                result.collected.push(control.clone());
            }
            CoverageStatus::Partial => result.partial.push(control.clone()),
            CoverageStatus::Outstanding => result.outstanding.push(control.clone()),
        }
    }

    debug!(
        framework = target.label(),
        collected = result.collected.len(),
        partial = result.partial.len(),
        outstanding = result.outstanding.len(),
        unmapped = result.unmapped.len(),
        "Classified controls"
    );

    result
}

/// Union of every evidence task referenced by the given frameworks
pub fn implemented_union<'a, I>(frameworks: I) -> ImplementedSet
where
    I: IntoIterator<Item = &'a Framework>,
{
    frameworks
        .into_iter()
        .flat_map(|framework| framework.controls().values().flatten())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn implemented(ids: &[&str]) -> ImplementedSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_way_classification() {
        let target = Framework::from_controls(
            "ISO",
            [
                ("A.1", vec!["E1", "E2"]),
                ("A.2", vec!["E1", "E3"]),
                ("A.3", vec!["E4"]),
            ],
        );
        let result = classify(&implemented(&["E1", "E2"]), &target);

        assert_eq!(result.collected, vec!["A.1"]);
        assert_eq!(result.partial, vec!["A.2"]);
        assert_eq!(result.outstanding, vec!["A.3"]);
        assert!(result.unmapped.is_empty());
    }

    #[test]
    fn test_empty_evidence_is_collected_and_unmapped() {
        let target = Framework::from_controls("SOC 2", [("CC9.9", Vec::<&str>::new())]);
        let result = classify(&ImplementedSet::new(), &target);

        assert_eq!(result.collected, vec!["CC9.9"]);
        assert_eq!(result.unmapped, vec!["CC9.9"]);
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_duplicates_in_evidence_list() {
        let target = Framework::from_controls("F", [("C1", vec!["E1", "E1"]), ("C2", vec!["E2", "E2", "E1"])]);
        let result = classify(&implemented(&["E1"]), &target);

        assert_eq!(result.collected, vec!["C1"]);
        assert_eq!(result.partial, vec!["C2"]);
    }

    #[test]
    fn test_control_named_label_is_classified() {
        let target = Framework::from_controls("F", [("label", vec!["E9"])]);
        let result = classify(&implemented(&["E1"]), &target);
        assert_eq!(result.outstanding, vec!["label"]);
    }

    #[test]
    fn test_order_follows_framework() {
        let target = Framework::from_controls(
            "F",
            [("Z", vec!["E1"]), ("A", vec!["E1"]), ("M", vec!["E1"])],
        );
        let result = classify(&implemented(&["E1"]), &target);
        assert_eq!(result.collected, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_status_of() {
        let target = Framework::from_controls("F", [("C1", vec!["E1"]), ("C2", vec!["E2"])]);
        let result = classify(&implemented(&["E1"]), &target);

        assert_eq!(result.status_of("C1"), Some(CoverageStatus::Collected));
        assert_eq!(result.status_of("C2"), Some(CoverageStatus::Outstanding));
        assert_eq!(result.status_of("C3"), None);
    }

    #[test]
    fn test_implemented_union_across_frameworks() {
        let nist = Framework::from_controls("NIST CSF", [("ID.AM-1", vec!["E1", "E2"])]);
        let soc = Framework::from_controls("SOC 2", [("CC1.1", vec!["E2", "E3"]), ("CC1.2", vec![])]);

        let union = implemented_union([&nist, &soc]);
        assert_eq!(union, implemented(&["E1", "E2", "E3"]));
        assert!(implemented_union(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_status_names_and_headings() {
        let names: Vec<_> = CoverageStatus::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Collected", "Partially Collected", "Outstanding"]);
        assert_eq!(CoverageStatus::Partial.heading(), "Partially Collected Controls");
    }
}
