//! Joined-catalog builder
//!
//! The control catalog fixes the control universe of every framework before
//! any evidence is joined: each (control, framework) pair gets an empty
//! evidence list. The evidence catalog then attaches each evidence task to
//! the controls it names, but only within frameworks and controls that the
//! control catalog registered. References outside that universe are common
//! in real exports and are dropped, not reported as errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::filter::{passes, CategoryFilter};
use super::{cell, split_list};
use crate::error::{Error, Result};
use crate::framework::FrameworkSet;

/// Column positions in the two catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogLayout {
    /// Control catalog: control name
    pub control_name: usize,
    /// Control catalog: newline-joined framework names
    pub control_frameworks: usize,
    /// Evidence catalog: evidence task id
    pub evidence_id: usize,
    /// Evidence catalog: newline-joined control names
    pub evidence_controls: usize,
    /// Evidence catalog: newline-joined framework names
    pub evidence_frameworks: usize,
}

impl Default for CatalogLayout {
    /// Column positions of the control and evidence-task exports
    fn default() -> Self {
        Self {
            control_name: 1,
            control_frameworks: 6,
            evidence_id: 0,
            evidence_controls: 7,
            evidence_frameworks: 8,
        }
    }
}

impl CatalogLayout {
    /// Minimal layout: `(control, frameworks)` and `(id, controls, frameworks)`
    pub fn compact() -> Self {
        Self {
            control_name: 0,
            control_frameworks: 1,
            evidence_id: 0,
            evidence_controls: 1,
            evidence_frameworks: 2,
        }
    }

    /// Highest column a control catalog row must have
    fn control_last_column(&self) -> usize {
        self.control_name.max(self.control_frameworks)
    }

    /// Highest column an evidence catalog row must have
    fn evidence_last_column(&self) -> usize {
        self.evidence_id
            .max(self.evidence_controls)
            .max(self.evidence_frameworks)
    }
}

/// Counters describing how the evidence catalog joined onto the controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    /// Control catalog rows read
    pub control_rows: usize,
    /// Evidence catalog rows read
    pub evidence_rows: usize,
    /// Rows excluded by a category filter (either catalog)
    pub filtered_rows: usize,
    /// Evidence tasks appended to a control
    pub assignments: usize,
    /// Framework references absent from the control catalog
    pub unknown_frameworks: usize,
    /// Control references absent from the referenced framework
    pub unknown_controls: usize,
}

impl JoinStats {
    /// Whether every reference in the evidence catalog resolved
    pub fn is_clean(&self) -> bool {
        self.unknown_frameworks == 0 && self.unknown_controls == 0
    }
}

/// Builds frameworks by joining a control catalog with an evidence catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    layout: CatalogLayout,
    control_filter: Option<CategoryFilter>,
    evidence_filter: Option<CategoryFilter>,
}

impl CatalogBuilder {
    /// Create a builder for the given column layout
    pub fn new(layout: CatalogLayout) -> Self {
        Self {
            layout,
            control_filter: None,
            evidence_filter: None,
        }
    }

    /// Only register controls whose catalog row passes `filter`
    pub fn with_control_filter(mut self, filter: CategoryFilter) -> Self {
        self.control_filter = Some(filter);
        self
    }

    /// Only join evidence tasks whose catalog row passes `filter`
    pub fn with_evidence_filter(mut self, filter: CategoryFilter) -> Self {
        self.evidence_filter = Some(filter);
        self
    }

    /// Column layout in use
    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    /// Build frameworks, discarding join statistics
    pub fn build<C, CS, E, ES>(&self, control_rows: &[C], evidence_rows: &[E]) -> Result<FrameworkSet>
    where
        C: AsRef<[CS]>,
        CS: AsRef<str>,
        E: AsRef<[ES]>,
        ES: AsRef<str>,
    {
        self.build_with_stats(control_rows, evidence_rows)
            .map(|(frameworks, _)| frameworks)
    }

    /// Build frameworks and report how the join went
    pub fn build_with_stats<C, CS, E, ES>(
        &self,
        control_rows: &[C],
        evidence_rows: &[E],
    ) -> Result<(FrameworkSet, JoinStats)>
    where
        C: AsRef<[CS]>,
        CS: AsRef<str>,
        E: AsRef<[ES]>,
        ES: AsRef<str>,
    {
        let mut frameworks = FrameworkSet::new();
        let mut stats = JoinStats {
            control_rows: control_rows.len(),
            evidence_rows: evidence_rows.len(),
            ..JoinStats::default()
        };

        self.register_controls(control_rows, &mut frameworks, &mut stats)?;
        self.join_evidence(evidence_rows, &mut frameworks, &mut stats)?;

        info!(
            frameworks = frameworks.len(),
            controls = frameworks.iter().map(|f| f.control_count()).sum::<usize>(),
            assignments = stats.assignments,
            unknown_frameworks = stats.unknown_frameworks,
            unknown_controls = stats.unknown_controls,
            "Built frameworks from control and evidence catalogs"
        );

        Ok((frameworks, stats))
    }

    fn register_controls<C, CS>(
        &self,
        rows: &[C],
        frameworks: &mut FrameworkSet,
        stats: &mut JoinStats,
    ) -> Result<()>
    where
        C: AsRef<[CS]>,
        CS: AsRef<str>,
    {
        let last = self.layout.control_last_column();
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() <= last {
                return Err(short_row("control catalog", index, last, row.len()));
            }
            if !passes(self.control_filter.as_ref(), row) {
                stats.filtered_rows += 1;
                continue;
            }

            let control = cell(row, self.layout.control_name).unwrap_or_default();
            let names = cell(row, self.layout.control_frameworks).unwrap_or_default();
            for label in split_list(names).filter(|l| !l.is_empty()) {
                frameworks.get_or_create(label).register_control(control);
            }
        }
        Ok(())
    }

    fn join_evidence<E, ES>(
        &self,
        rows: &[E],
        frameworks: &mut FrameworkSet,
        stats: &mut JoinStats,
    ) -> Result<()>
    where
        E: AsRef<[ES]>,
        ES: AsRef<str>,
    {
        let last = self.layout.evidence_last_column();
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() <= last {
                return Err(short_row("evidence catalog", index, last, row.len()));
            }
            if !passes(self.evidence_filter.as_ref(), row) {
                stats.filtered_rows += 1;
                continue;
            }

            let task = cell(row, self.layout.evidence_id).unwrap_or_default();
            let controls = cell(row, self.layout.evidence_controls).unwrap_or_default();
            let names = cell(row, self.layout.evidence_frameworks).unwrap_or_default();

            for label in split_list(names).filter(|l| !l.is_empty()) {
                let Some(framework) = frameworks.get_mut(label) else {
                    debug!(task, framework = label, "Evidence references unknown framework");
                    stats.unknown_frameworks += 1;
                    continue;
                };
                for control in split_list(controls).filter(|c| !c.is_empty()) {
                    if framework.assign_existing(control, task) {
                        stats.assignments += 1;
                    } else {
                        debug!(
                            task,
                            framework = label,
                            control,
                            "Evidence references control outside framework"
                        );
                        stats.unknown_controls += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

fn short_row(catalog: &str, index: usize, last_column: usize, found: usize) -> Error {
    Error::malformed(
        format!("{} row {}", catalog, index + 1),
        format!("at least {} columns", last_column.saturating_add(1)),
        format!("{} columns", found),
    )
}

/// Build frameworks from two catalogs using `layout`
pub fn build_from_joined_catalogs<C, CS, E, ES>(
    control_rows: &[C],
    evidence_rows: &[E],
    layout: CatalogLayout,
) -> Result<FrameworkSet>
where
    C: AsRef<[CS]>,
    CS: AsRef<str>,
    E: AsRef<[ES]>,
    ES: AsRef<str>,
{
    CatalogBuilder::new(layout).build(control_rows, evidence_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_joins_only_listed_framework() {
        let controls = vec![vec!["C1", "FW-A\nFW-B"]];
        let evidence = vec![vec!["E1", "C1", "FW-A"]];

        let set = build_from_joined_catalogs(&controls, &evidence, CatalogLayout::compact()).unwrap();

        assert_eq!(set.get("FW-A").unwrap().evidence_for("C1").unwrap(), ["E1"]);
        assert!(set.get("FW-B").unwrap().evidence_for("C1").unwrap().is_empty());
    }

    #[test]
    fn test_default_layout_matches_exports() {
        let layout = CatalogLayout::default();
        assert_eq!(layout.control_name, 1);
        assert_eq!(layout.control_frameworks, 6);
        assert_eq!(layout.evidence_id, 0);
        assert_eq!(layout.evidence_controls, 7);
        assert_eq!(layout.evidence_frameworks, 8);
        assert_eq!(layout.control_last_column(), 6);
        assert_eq!(layout.evidence_last_column(), 8);
    }

    #[test]
    fn test_default_layout_build() {
        let controls = vec![
            vec!["1", "CC1.1", "", "", "", "", "SOC 2"],
            vec!["2", "ID.AM-1", "", "", "", "", "NIST CSF"],
        ];
        let evidence = vec![vec!["ET-10", "", "", "", "", "", "", "CC1.1\nID.AM-1", "SOC 2\nNIST CSF"]];

        let set = CatalogBuilder::default().build(&controls, &evidence).unwrap();
        assert_eq!(set.get("SOC 2").unwrap().evidence_for("CC1.1").unwrap(), ["ET-10"]);
        assert_eq!(set.get("NIST CSF").unwrap().evidence_for("ID.AM-1").unwrap(), ["ET-10"]);
    }

    #[test]
    fn test_unknown_references_are_skipped_and_counted() {
        let controls = vec![vec!["C1", "FW-A"]];
        let evidence = vec![
            vec!["E1", "C1\nC9", "FW-A"],
            vec!["E2", "C1", "FW-Z"],
        ];

        let (set, stats) = CatalogBuilder::new(CatalogLayout::compact())
            .build_with_stats(&controls, &evidence)
            .unwrap();

        let fw = set.get("FW-A").unwrap();
        assert_eq!(fw.control_count(), 1);
        assert_eq!(fw.evidence_for("C1").unwrap(), ["E1"]);
        assert!(!set.contains("FW-Z"));

        assert_eq!(stats.assignments, 1);
        assert_eq!(stats.unknown_controls, 1);
        assert_eq!(stats.unknown_frameworks, 1);
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_literal_order_of_frameworks_and_controls() {
        let controls = vec![
            vec!["C2", "FW-B\nFW-A"],
            vec!["C1", "FW-A"],
        ];
        let evidence = vec![vec!["E1", "C1\nC2", "FW-A"], vec!["E2", "C2", "FW-A\nFW-B"]];

        let set = build_from_joined_catalogs(&controls, &evidence, CatalogLayout::compact()).unwrap();

        let labels: Vec<_> = set.labels().collect();
        assert_eq!(labels, vec!["FW-B", "FW-A"]);

        let fw_a = set.get("FW-A").unwrap();
        let order: Vec<_> = fw_a.controls().keys().map(String::as_str).collect();
        assert_eq!(order, vec!["C2", "C1"]);
        assert_eq!(fw_a.evidence_for("C2").unwrap(), ["E1", "E2"]);
        assert_eq!(set.get("FW-B").unwrap().evidence_for("C2").unwrap(), ["E2"]);
    }

    #[test]
    fn test_control_without_frameworks_registers_nothing() {
        let controls = vec![vec!["C1", ""], vec!["C2", "FW-A"]];
        let evidence: Vec<Vec<&str>> = Vec::new();

        let set = build_from_joined_catalogs(&controls, &evidence, CatalogLayout::compact()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.get("FW-A").unwrap().has_control("C1"));
    }

    #[test]
    fn test_short_rows_are_malformed() {
        let controls = vec![vec!["C1"]];
        let evidence: Vec<Vec<&str>> = Vec::new();

        let err = build_from_joined_catalogs(&controls, &evidence, CatalogLayout::compact())
            .unwrap_err();
        assert_eq!(
            err,
            Error::malformed("control catalog row 1", "at least 2 columns", "1 columns")
        );

        let controls = vec![vec!["C1", "FW-A"]];
        let evidence = vec![vec!["E1", "C1"]];
        let err = build_from_joined_catalogs(&controls, &evidence, CatalogLayout::compact())
            .unwrap_err();
        assert!(err.to_string().contains("evidence catalog row 1"));
    }

    #[test]
    fn test_column_at_usize_max_is_malformed() {
        let layout = CatalogLayout {
            control_frameworks: usize::MAX,
            ..CatalogLayout::compact()
        };
        let controls = vec![vec!["C1", "FW-A"]];
        let evidence: Vec<Vec<&str>> = Vec::new();

        let err = build_from_joined_catalogs(&controls, &evidence, layout).unwrap_err();
        assert!(err.to_string().contains("control catalog row 1"));

        let layout = CatalogLayout {
            evidence_frameworks: usize::MAX,
            ..CatalogLayout::compact()
        };
        let evidence = vec![vec!["E1", "C1", "FW-A"]];
        let err = build_from_joined_catalogs(&controls, &evidence, layout).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput { ref context, .. } if context == "evidence catalog row 1"
        ));
    }

    #[test]
    fn test_control_filter_limits_universe() {
        let layout = CatalogLayout::compact();
        let controls = vec![vec!["CC1.1", "SOC 2", "CC"], vec!["A1.2", "SOC 2", "A"]];
        let evidence = vec![vec!["E1", "CC1.1\nA1.2", "SOC 2"]];

        let (set, stats) = CatalogBuilder::new(layout)
            .with_control_filter(CategoryFilter::new("A", 2))
            .build_with_stats(&controls, &evidence)
            .unwrap();

        let soc = set.get("SOC 2").unwrap();
        assert_eq!(soc.control_count(), 1);
        assert_eq!(soc.evidence_for("A1.2").unwrap(), ["E1"]);
        assert_eq!(stats.filtered_rows, 1);
        assert_eq!(stats.unknown_controls, 1);
    }

    #[test]
    fn test_evidence_filter_skips_rows() {
        let controls = vec![vec!["C1", "FW-A"]];
        let evidence = vec![vec!["E1", "C1", "FW-A", "X"], vec!["E2", "C1", "FW-A", "Y"]];

        let set = CatalogBuilder::new(CatalogLayout::compact())
            .with_evidence_filter(CategoryFilter::new("Y", 3))
            .build(&controls, &evidence)
            .unwrap();

        assert_eq!(set.get("FW-A").unwrap().evidence_for("C1").unwrap(), ["E2"]);
    }
}
