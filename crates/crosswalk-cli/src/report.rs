//! Breakdown files and JSON reports

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crosswalk::{ClassificationResult, Comparison, CoverageStatus, CoverageSummary, JoinStats};

use crate::error::{CliError, Result};

/// Per-control breakdown of one comparison
///
/// Three sections in report order, each a heading followed by one control
/// per line, separated by blank lines.
pub fn breakdown_section(result: &ClassificationResult) -> String {
    let mut out = String::new();
    for (i, status) in CoverageStatus::ALL.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}:", status.heading());
        for control in result.controls(status) {
            let _ = writeln!(out, "{}", control);
        }
    }
    out
}

/// Breakdown text for one or more comparisons
///
/// A single comparison is written bare. Several comparisons each get a
/// `== title ==` line ahead of their sections.
pub fn breakdown_text(comparisons: &[Comparison]) -> String {
    match comparisons {
        [only] => breakdown_section(&only.result),
        _ => comparisons
            .iter()
            .map(|c| format!("== {} ==\n{}", c.title(), breakdown_section(&c.result)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Write the breakdown file, replacing any previous one
pub fn write_breakdown(path: &Path, comparisons: &[Comparison]) -> Result<()> {
    std::fs::write(path, breakdown_text(comparisons)).map_err(|e| CliError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), comparisons = comparisons.len(), "Wrote breakdown");
    Ok(())
}

/// One comparison in a JSON report
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub title: String,
    pub implemented: &'a [String],
    pub target: &'a str,
    pub implemented_tasks: usize,
    pub summary: CoverageSummary,
    pub controls: &'a ClassificationResult,
}

impl<'a> From<&'a Comparison> for ComparisonReport<'a> {
    fn from(comparison: &'a Comparison) -> Self {
        Self {
            title: comparison.title(),
            implemented: &comparison.implemented,
            target: &comparison.target,
            implemented_tasks: comparison.implemented_tasks,
            summary: comparison.summary(),
            controls: &comparison.result,
        }
    }
}

/// JSON report for a `compare` or `cross` run
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinStats>,
    pub comparisons: Vec<ComparisonReport<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(comparisons: &'a [Comparison], join: Option<JoinStats>) -> Self {
        Self {
            generated_at: Utc::now(),
            join,
            comparisons: comparisons.iter().map(ComparisonReport::from).collect(),
        }
    }
}
