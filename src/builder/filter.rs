//! Row filtering by category code
//!
//! Export rows carry a cell of newline-joined category codes (for SOC 2 these
//! are Trust Services Criteria groups such as `CC`, `A` or `PI`). A filter
//! keeps only rows tagged with one code, which narrows an analysis to a
//! subset of controls without changing how frameworks are built.

use serde::{Deserialize, Serialize};

use super::{cell, split_list};

/// Inclusion test on a row's category-code cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Code a row must carry; empty disables filtering
    pub code: String,

    /// Column holding the row's newline-joined codes
    pub column: usize,
}

impl CategoryFilter {
    /// Create a filter for `code` read from `column`
    pub fn new(code: impl Into<String>, column: usize) -> Self {
        Self {
            code: code.into(),
            column,
        }
    }

    /// Whether filtering is disabled
    pub fn is_pass_through(&self) -> bool {
        self.code.is_empty()
    }

    /// Whether `row` passes the filter
    ///
    /// A row without the filter column has no codes and only passes when
    /// filtering is disabled.
    pub fn accepts<S: AsRef<str>>(&self, row: &[S]) -> bool {
        if self.is_pass_through() {
            return true;
        }
        cell(row, self.column).is_some_and(|codes| contains_code(codes, &self.code))
    }
}

/// Whether a newline-joined code list contains `code`
///
/// An empty `code` matches everything. Matching is exact per element, so
/// `"CC"` does not match `"CC1"`.
pub fn contains_code(codes: &str, code: &str) -> bool {
    code.is_empty() || split_list(codes).any(|c| c == code)
}

/// Apply an optional filter
pub(crate) fn passes<S: AsRef<str>>(filter: Option<&CategoryFilter>, row: &[S]) -> bool {
    filter.map_or(true, |f| f.accepts(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_code_accepts_everything() {
        assert!(contains_code("", ""));
        assert!(contains_code("CC\nA", ""));
        let filter = CategoryFilter::new("", 3);
        assert!(filter.accepts(&["E1"]));
    }

    #[test]
    fn test_exact_element_match() {
        assert!(contains_code("CC\nA\nPI", "A"));
        assert!(!contains_code("CC1\nA1", "CC"));
        assert!(!contains_code("", "CC"));
    }

    #[test]
    fn test_windows_line_endings() {
        assert!(contains_code("CC\r\nA", "CC"));
    }

    #[test]
    fn test_row_filter() {
        let filter = CategoryFilter::new("C", 2);
        assert!(filter.accepts(&["E1", "x", "A\nC"]));
        assert!(!filter.accepts(&["E2", "x", "A"]));
        assert!(!filter.accepts(&["E3", "x"]));
    }

    #[test]
    fn test_optional_filter() {
        let row = ["E1", "x", "A"];
        assert!(passes(None, &row));
        assert!(!passes(Some(&CategoryFilter::new("C", 2)), &row));
    }
}
