//! Framework construction from tabular exports
//!
//! Two export shapes are supported:
//!
//! - **Wide table** ([`WideTableBuilder`]): one row per evidence task, with
//!   one column per framework naming the control the task satisfies.
//! - **Joined catalogs** ([`CatalogBuilder`]): a control catalog listing the
//!   frameworks each control belongs to, and an evidence catalog listing the
//!   controls and frameworks each evidence task satisfies.
//!
//! Rows are plain string fields; reading files is left to the caller.
//!
//! # Usage
//!
//! ```ignore
//! use crosswalk::builder::WideTableBuilder;
//!
//! let frameworks = WideTableBuilder::new(4).build(&header, &rows)?;
//! let soc2 = frameworks.get("SOC 2")?;
//! ```

mod catalog;
mod filter;
mod wide;

pub use catalog::{build_from_joined_catalogs, CatalogBuilder, CatalogLayout, JoinStats};
pub use filter::{contains_code, CategoryFilter};
pub use wide::{build_from_wide_table, WideTableBuilder};

/// Borrow a cell, `None` when the row is too short
pub(crate) fn cell<S: AsRef<str>>(row: &[S], index: usize) -> Option<&str> {
    row.get(index).map(AsRef::as_ref)
}

/// Split a newline-joined cell in literal order
///
/// Exports written on Windows use `\r\n` inside quoted cells, so a trailing
/// `\r` is dropped from each element.
pub(crate) fn split_list(field: &str) -> impl Iterator<Item = &str> {
    field
        .split('\n')
        .map(|item| item.strip_suffix('\r').unwrap_or(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_keeps_literal_order() {
        let items: Vec<_> = split_list("NIST CSF\nSOC 2\r\nISO 27001:2013").collect();
        assert_eq!(items, vec!["NIST CSF", "SOC 2", "ISO 27001:2013"]);
    }

    #[test]
    fn test_cell_out_of_range() {
        let row = ["a", "b"];
        assert_eq!(cell(&row, 1), Some("b"));
        assert_eq!(cell(&row, 2), None);
    }
}
