//! Coverage ratio and display summary

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::ClassificationResult;
use crate::error::{Error, Result};

/// Collected controls as a fraction of all classified controls
///
/// Returns [`Error::DivisionUndefined`] when nothing was classified.
pub fn coverage_ratio(result: &ClassificationResult) -> Result<f64> {
    let total = result.total();
    if total == 0 {
        return Err(Error::DivisionUndefined);
    }
    Ok(result.collected.len() as f64 / total as f64)
}

/// Percentage for display, rendering an undefined ratio as `N/A`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Option<f64>);

impl Percentage {
    /// Wrap a ratio in `[0, 1]`
    pub fn from_ratio(ratio: Result<f64>) -> Self {
        Self(ratio.ok().map(|r| r * 100.0))
    }

    /// Whether the percentage is defined
    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:.2}%", value),
            None => f.write_str("N/A"),
        }
    }
}

/// Counts and percentage of one classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Collected controls (including unmapped ones)
    pub collected: usize,
    /// Partially collected controls
    pub partial: usize,
    /// Outstanding controls
    pub outstanding: usize,
    /// Collected controls with no evidence mapped
    pub unmapped: usize,
    /// All classified controls
    pub total: usize,
    /// Collected percentage, `null` when there are no controls
    pub percentage: Percentage,
}

impl CoverageSummary {
    /// Summarize a classification
    pub fn from_result(result: &ClassificationResult) -> Self {
        Self {
            collected: result.collected.len(),
            partial: result.partial.len(),
            outstanding: result.outstanding.len(),
            unmapped: result.unmapped.len(),
            total: result.total(),
            percentage: Percentage::from_ratio(coverage_ratio(result)),
        }
    }
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collected controls: {}", self.collected)?;
        writeln!(f, "Partially collected controls: {}", self.partial)?;
        writeln!(f, "Controls with unique ETs: {}", self.outstanding)?;
        write!(
            f,
            "Collected controls/rest = {}/{} = {}",
            self.collected, self.total, self.percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(collected: usize, partial: usize, outstanding: usize) -> ClassificationResult {
        let names = |prefix: &str, n: usize| (0..n).map(|i| format!("{}{}", prefix, i)).collect();
        ClassificationResult {
            collected: names("C", collected),
            partial: names("P", partial),
            outstanding: names("O", outstanding),
            unmapped: Vec::new(),
        }
    }

    #[test]
    fn test_ratio() {
        assert_eq!(coverage_ratio(&result(1, 0, 1)).unwrap(), 0.5);
        assert_eq!(coverage_ratio(&result(3, 1, 0)).unwrap(), 0.75);
        assert_eq!(coverage_ratio(&result(0, 2, 2)).unwrap(), 0.0);
    }

    #[test]
    fn test_ratio_undefined_for_empty_framework() {
        assert_eq!(
            coverage_ratio(&ClassificationResult::default()),
            Err(Error::DivisionUndefined)
        );
    }

    #[test]
    fn test_percentage_display() {
        assert_eq!(Percentage::from_ratio(Ok(0.5)).to_string(), "50.00%");
        assert_eq!(Percentage::from_ratio(Ok(1.0 / 3.0)).to_string(), "33.33%");
        assert_eq!(
            Percentage::from_ratio(Err(Error::DivisionUndefined)).to_string(),
            "N/A"
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = CoverageSummary::from_result(&result(2, 1, 1));
        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.to_string(),
            "Collected controls: 2\n\
             Partially collected controls: 1\n\
             Controls with unique ETs: 1\n\
             Collected controls/rest = 2/4 = 50.00%"
        );
    }

    #[test]
    fn test_summary_empty_is_not_available() {
        let summary = CoverageSummary::from_result(&ClassificationResult::default());
        assert!(!summary.percentage.is_defined());
        assert!(summary.to_string().ends_with("0/0 = N/A"));
    }

    #[test]
    fn test_summary_serializes_null_percentage() {
        let summary = CoverageSummary::from_result(&ClassificationResult::default());
        let json = serde_json::to_value(summary).unwrap();
        assert!(json["percentage"].is_null());
    }
}
