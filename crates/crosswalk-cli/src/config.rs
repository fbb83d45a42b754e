//! Configuration parsing for crosswalk.toml
//!
//! This module defines the schema for crosswalk.toml: where the exports live,
//! which layout they use, optional category filtering, and where reports go.
//! Every section is optional; command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crosswalk::{CatalogLayout, CategoryFilter};

use crate::error::{CliError, Result};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "crosswalk.toml";

/// Root configuration structure for crosswalk.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrosswalkConfig {
    /// Input files and their shape
    #[serde(default)]
    pub source: SourceConfig,

    /// Wide-table layout
    #[serde(default)]
    pub wide: WideConfig,

    /// Catalog column layout
    #[serde(default)]
    pub catalog: CatalogLayout,

    /// Category filter
    #[serde(default)]
    pub filter: Option<FilterConfig>,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CrosswalkConfig {
    /// Load configuration from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_str(&content, path)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the configuration for this run
    ///
    /// An explicitly given path must exist. Without one, `crosswalk.toml` in
    /// the working directory is used when present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::ConfigNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Row filter, if a non-empty code is configured
    pub fn category_filter(&self) -> Option<CategoryFilter> {
        self.filter
            .as_ref()
            .filter(|f| !f.code.is_empty())
            .map(|f| CategoryFilter::new(f.code.clone(), f.column))
    }

    /// Check that the configured mode has the files it needs
    pub fn validate(&self) -> Result<()> {
        match self.source.mode {
            SourceMode::Wide => {
                if self.source.table.is_none() {
                    return Err(CliError::missing("source.table"));
                }
            }
            SourceMode::Catalog => {
                if self.source.controls.is_none() {
                    return Err(CliError::missing("source.controls"));
                }
                if self.source.evidence.is_none() {
                    return Err(CliError::missing("source.evidence"));
                }
            }
        }
        if let Some(filter) = &self.filter {
            if filter.target == FilterTarget::Controls && self.source.mode == SourceMode::Wide {
                return Err(CliError::invalid(
                    "filter.target",
                    "wide tables have one row per evidence task; use \"evidence\"",
                ));
            }
        }
        Ok(())
    }
}

/// Shape of the input exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Single table, one column per framework
    Wide,
    /// Control catalog joined with evidence catalog
    #[default]
    Catalog,
}

impl SourceMode {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wide" | "table" => Some(Self::Wide),
            "catalog" | "catalogs" | "joined" => Some(Self::Catalog),
            _ => None,
        }
    }
}

/// Input file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Layout of the inputs
    #[serde(default)]
    pub mode: SourceMode,

    /// Wide table CSV (wide mode)
    #[serde(default)]
    pub table: Option<PathBuf>,

    /// Control catalog CSV (catalog mode)
    #[serde(default)]
    pub controls: Option<PathBuf>,

    /// Evidence-task catalog CSV (catalog mode)
    #[serde(default)]
    pub evidence: Option<PathBuf>,
}

/// Wide-table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WideConfig {
    /// Index of the first framework column
    #[serde(default = "default_framework_column_start")]
    pub framework_column_start: usize,
}

impl Default for WideConfig {
    fn default() -> Self {
        Self {
            framework_column_start: default_framework_column_start(),
        }
    }
}

fn default_framework_column_start() -> usize {
    4
}

/// Which rows a category filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTarget {
    /// Control catalog rows (catalog mode)
    #[default]
    Controls,
    /// Evidence rows (either mode)
    Evidence,
}

/// Category filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Category code to keep (e.g., "CC"); empty disables filtering
    #[serde(default)]
    pub code: String,

    /// Column holding the newline-joined codes
    pub column: usize,

    /// Catalog the filter applies to
    #[serde(default)]
    pub target: FilterTarget,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Write the per-control breakdown file
    #[serde(default = "default_true")]
    pub write_breakdown: bool,

    /// Breakdown file path
    #[serde(default = "default_breakdown_path")]
    pub breakdown_path: PathBuf,

    /// Width of terminal bar charts in characters
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            write_breakdown: true,
            breakdown_path: default_breakdown_path(),
            chart_width: default_chart_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_breakdown_path() -> PathBuf {
    PathBuf::from("Control_breakdown.txt")
}

fn default_chart_width() -> usize {
    50
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable
    #[default]
    Compact,
    /// Multi-line human readable
    Pretty,
    /// One JSON object per line
    Json,
}

/// Template written by `crosswalk init`
pub fn init_template(mode: SourceMode) -> String {
    let (wide, catalog) = match mode {
        SourceMode::Wide => ("", "# "),
        SourceMode::Catalog => ("# ", ""),
    };
    format!(
        r#"# Crosswalk Configuration

[source]
mode = "{mode}"
{wide}table = "evidence_tasks.csv"
{catalog}controls = "controls_export.csv"
{catalog}evidence = "evidence_tasks_export.csv"

# Wide tables: column 0 is the evidence task id, framework columns start here
[wide]
framework_column_start = 4

# Catalog column positions (0-based)
[catalog]
control_name = 1
control_frameworks = 6
evidence_id = 0
evidence_controls = 7
evidence_frameworks = 8

# Restrict the analysis to rows tagged with one category code
# [filter]
# code = "CC"
# column = 5
# target = "controls"

[report]
write_breakdown = true
breakdown_path = "Control_breakdown.txt"
chart_width = 50

[logging]
filter = "warn"
format = "compact"
"#,
        mode = match mode {
            SourceMode::Wide => "wide",
            SourceMode::Catalog => "catalog",
        },
        wide = wide,
        catalog = catalog,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = CrosswalkConfig::from_str("", Path::new("test.toml")).unwrap();
        assert_eq!(config.source.mode, SourceMode::Catalog);
        assert_eq!(config.wide.framework_column_start, 4);
        assert_eq!(config.catalog, CatalogLayout::default());
        assert!(config.report.write_breakdown);
        assert_eq!(config.report.breakdown_path, PathBuf::from("Control_breakdown.txt"));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[source]
mode = "wide"
table = "mycsv.csv"

[wide]
framework_column_start = 5

[filter]
code = "CC"
column = 3
target = "evidence"

[report]
write_breakdown = false
chart_width = 30

[logging]
format = "json"
"#;

        let config = CrosswalkConfig::from_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.source.mode, SourceMode::Wide);
        assert_eq!(config.source.table, Some(PathBuf::from("mycsv.csv")));
        assert_eq!(config.wide.framework_column_start, 5);
        assert_eq!(config.category_filter(), Some(CategoryFilter::new("CC", 3)));
        assert!(!config.report.write_breakdown);
        assert_eq!(config.report.chart_width, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_catalog_layout() {
        let toml = r#"
[catalog]
control_name = 0
"#;
        let config = CrosswalkConfig::from_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.catalog.control_name, 0);
        assert_eq!(config.catalog.control_frameworks, 6);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = CrosswalkConfig::from_str("[source\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, CliError::ConfigParse { ref path, .. } if path == Path::new("bad.toml")));
    }

    #[test]
    fn test_validate_requires_files_for_mode() {
        let mut config = CrosswalkConfig::default();
        assert!(matches!(
            config.validate(),
            Err(CliError::MissingRequired { ref field }) if field == "source.controls"
        ));

        config.source.controls = Some(PathBuf::from("c.csv"));
        config.source.evidence = Some(PathBuf::from("e.csv"));
        assert!(config.validate().is_ok());

        config.source.mode = SourceMode::Wide;
        assert!(matches!(
            config.validate(),
            Err(CliError::MissingRequired { ref field }) if field == "source.table"
        ));
    }

    #[test]
    fn test_control_filter_rejected_for_wide_tables() {
        let mut config = CrosswalkConfig::default();
        config.source.mode = SourceMode::Wide;
        config.source.table = Some(PathBuf::from("t.csv"));
        config.filter = Some(FilterConfig {
            code: "CC".to_string(),
            column: 3,
            target: FilterTarget::Controls,
        });
        assert!(matches!(config.validate(), Err(CliError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_filter_code_disables_filter() {
        let mut config = CrosswalkConfig::default();
        config.filter = Some(FilterConfig {
            code: String::new(),
            column: 3,
            target: FilterTarget::Evidence,
        });
        assert_eq!(config.category_filter(), None);
    }

    #[test]
    fn test_init_template_parses() {
        for mode in [SourceMode::Wide, SourceMode::Catalog] {
            let template = init_template(mode);
            let config = CrosswalkConfig::from_str(&template, Path::new("crosswalk.toml")).unwrap();
            assert_eq!(config.source.mode, mode);
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_source_mode_parse() {
        assert_eq!(SourceMode::parse("Wide"), Some(SourceMode::Wide));
        assert_eq!(SourceMode::parse("catalog"), Some(SourceMode::Catalog));
        assert_eq!(SourceMode::parse("xlsx"), None);
    }
}
