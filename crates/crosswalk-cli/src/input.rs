//! CSV input
//!
//! Reads exports into rows of strings and hands them to the framework
//! builders. Core errors are wrapped with the path of the file they came
//! from.

use std::path::{Path, PathBuf};

use crosswalk::{CatalogBuilder, FrameworkSet, JoinStats, WideTableBuilder};
use tracing::debug;

use crate::config::{CrosswalkConfig, FilterTarget, SourceMode};
use crate::error::{CliError, Result};

/// A CSV file split into header and data rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a CSV file; the first record is the header
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| csv_error(path, csv::Error::from(e)))?;
        Self::parse(&content, path)
    }

    /// Parse CSV content; `path` is only used for error reporting
    ///
    /// Records may have differing lengths and cells may contain quoted
    /// newlines (multi-value cells).
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let mut records = records.into_iter();
        let header = records.next().unwrap_or_default();
        let rows: Vec<_> = records.collect();
        debug!(path = %path.display(), rows = rows.len(), "Read CSV");

        Ok(Self { header, rows })
    }
}

fn csv_error(path: &Path, source: csv::Error) -> CliError {
    CliError::CsvRead {
        path: path.to_path_buf(),
        source,
    }
}

fn input_error(path: &Path, source: crosswalk::Error) -> CliError {
    CliError::Input {
        path: path.to_path_buf(),
        source,
    }
}

/// Frameworks loaded for a run
#[derive(Debug)]
pub struct Loaded {
    pub frameworks: FrameworkSet,

    /// Join statistics (catalog mode only)
    pub join: Option<JoinStats>,
}

/// Build frameworks from the files named in `config`
pub fn load_frameworks(config: &CrosswalkConfig) -> Result<Loaded> {
    config.validate()?;

    match config.source.mode {
        SourceMode::Wide => {
            let path = required(&config.source.table, "source.table")?;
            let table = Table::read(path)?;
            load_wide(config, &table, path)
        }
        SourceMode::Catalog => {
            let controls_path = required(&config.source.controls, "source.controls")?;
            let evidence_path = required(&config.source.evidence, "source.evidence")?;
            let controls = Table::read(controls_path)?;
            let evidence = Table::read(evidence_path)?;
            load_catalogs(config, &controls, controls_path, &evidence, evidence_path)
        }
    }
}

fn required<'a>(path: &'a Option<PathBuf>, field: &str) -> Result<&'a Path> {
    path.as_deref().ok_or_else(|| CliError::missing(field))
}

/// Build frameworks from a wide table
pub fn load_wide(config: &CrosswalkConfig, table: &Table, path: &Path) -> Result<Loaded> {
    let mut builder = WideTableBuilder::new(config.wide.framework_column_start);
    if let Some(filter) = config.category_filter() {
        builder = builder.with_filter(filter);
    }

    let frameworks = builder
        .build(&table.header, &table.rows)
        .map_err(|e| input_error(path, e))?;

    Ok(Loaded {
        frameworks,
        join: None,
    })
}

/// Build frameworks from a control catalog and an evidence catalog
///
/// Both files have a header row, which is skipped. A malformed row is
/// reported against the file it came from.
pub fn load_catalogs(
    config: &CrosswalkConfig,
    controls: &Table,
    controls_path: &Path,
    evidence: &Table,
    evidence_path: &Path,
) -> Result<Loaded> {
    let mut builder = CatalogBuilder::new(config.catalog);
    if let (Some(filter), Some(target)) = (
        config.category_filter(),
        config.filter.as_ref().map(|f| f.target),
    ) {
        builder = match target {
            FilterTarget::Controls => builder.with_control_filter(filter),
            FilterTarget::Evidence => builder.with_evidence_filter(filter),
        };
    }

    let (frameworks, stats) = builder
        .build_with_stats(&controls.rows, &evidence.rows)
        .map_err(|e| match &e {
            crosswalk::Error::MalformedInput { context, .. }
                if context.starts_with("evidence catalog") =>
            {
                input_error(evidence_path, e)
            }
            _ => input_error(controls_path, e),
        })?;

    Ok(Loaded {
        frameworks,
        join: Some(stats),
    })
}
