//! Stacked bar layout
//!
//! Each bar stacks collected, partially collected and outstanding controls.
//! Bars share one scale so that frameworks of different sizes can be
//! compared side by side.

use crosswalk::{Comparison, CoverageStatus, CoverageSummary};

/// One labelled bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub summary: CoverageSummary,
}

impl Bar {
    pub fn new(label: impl Into<String>, summary: CoverageSummary) -> Self {
        Self {
            label: label.into(),
            summary,
        }
    }

    /// Bar labelled with the comparison title, e.g. `"A to B"`
    pub fn titled(comparison: &Comparison) -> Self {
        Self::new(comparison.title(), comparison.summary())
    }

    /// Bar labelled with the target framework
    pub fn for_target(comparison: &Comparison) -> Self {
        Self::new(comparison.target.clone(), comparison.summary())
    }

    /// Count for one segment
    pub fn count(&self, status: CoverageStatus) -> usize {
        match status {
            CoverageStatus::Collected => self.summary.collected,
            CoverageStatus::Partial => self.summary.partial,
            CoverageStatus::Outstanding => self.summary.outstanding,
        }
    }
}

/// Character widths of the three segments, in [`CoverageStatus::ALL`] order
///
/// `max_total` controls map to `width` characters. Segment edges are rounded
/// on the running total, so the widths always sum to the rounded width of
/// the whole bar.
pub fn segment_widths(summary: &CoverageSummary, max_total: usize, width: usize) -> [usize; 3] {
    if max_total == 0 || width == 0 {
        return [0; 3];
    }

    let scale = |n: usize| ((n * width) as f64 / max_total as f64).round() as usize;
    let counts = [summary.collected, summary.partial, summary.outstanding];

    let mut widths = [0; 3];
    let mut running = 0;
    let mut drawn = 0;
    for (slot, count) in widths.iter_mut().zip(counts) {
        running += count;
        let edge = scale(running);
        *slot = edge - drawn;
        drawn = edge;
    }
    widths
}

/// Largest control total across `bars`
pub fn max_total(bars: &[Bar]) -> usize {
    bars.iter().map(|b| b.summary.total).max().unwrap_or(0)
}
