//! Wide-table builder
//!
//! Layout of a wide export (header row shown):
//!
//! ```text
//! ET ID | Name | Description | TSC | SOC 2  | ISO 27001
//! ET-1  | ...  | ...         | CC  | CC6.1  | A.9.2.1
//! ET-2  | ...  | ...         | A   |        | A.12.3.1
//! ```
//!
//! Column 0 is the evidence task id. Every column from
//! `framework_column_start` on is one framework, labelled by its header.

use tracing::{debug, info};

use super::filter::{passes, CategoryFilter};
use super::cell;
use crate::error::{Error, Result};
use crate::framework::FrameworkSet;

/// Builds frameworks from a single wide table
#[derive(Debug, Clone)]
pub struct WideTableBuilder {
    framework_column_start: usize,
    filter: Option<CategoryFilter>,
}

impl WideTableBuilder {
    /// Create a builder whose framework columns start at `framework_column_start`
    pub fn new(framework_column_start: usize) -> Self {
        Self {
            framework_column_start,
            filter: None,
        }
    }

    /// Only assign rows accepted by `filter`
    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Index of the first framework column
    pub fn framework_column_start(&self) -> usize {
        self.framework_column_start
    }

    /// Build one framework per framework column
    ///
    /// `rows` must not include the header. A data row shorter than the
    /// header contributes nothing for the columns it lacks.
    pub fn build<H, R, S>(&self, header: &[H], rows: &[R]) -> Result<FrameworkSet>
    where
        H: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let start = self.framework_column_start;
        if header.len() <= start {
            return Err(Error::malformed(
                "header",
                format!("at least {} columns", start.saturating_add(1)),
                format!("{} columns", header.len()),
            ));
        }

        let labels: Vec<&str> = header[start..].iter().map(AsRef::as_ref).collect();
        let mut frameworks = FrameworkSet::new();
        for label in &labels {
            frameworks.get_or_create(label);
        }

        let mut skipped = 0usize;
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let task = cell(row, 0).ok_or_else(|| {
                Error::malformed(format!("row {}", index + 1), "at least 1 column", "0 columns")
            })?;

            if !passes(self.filter.as_ref(), row) {
                skipped += 1;
                continue;
            }

            for (offset, label) in labels.iter().enumerate() {
                let control = match cell(row, start + offset) {
                    Some(control) if !control.is_empty() => control,
                    _ => continue,
                };
                if let Some(framework) = frameworks.get_mut(label) {
                    framework.assign(control, task);
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, "Rows excluded by category filter");
        }
        info!(
            frameworks = frameworks.len(),
            rows = rows.len(),
            "Built frameworks from wide table"
        );

        Ok(frameworks)
    }
}

/// Build frameworks from a wide table without filtering
pub fn build_from_wide_table<H, R, S>(
    header: &[H],
    rows: &[R],
    framework_column_start: usize,
) -> Result<FrameworkSet>
where
    H: AsRef<str>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    WideTableBuilder::new(framework_column_start).build(header, rows)
}
