//! Crosswalk CLI - Evidence coverage across compliance frameworks
//!
//! Loads control and evidence-task exports, builds one control-to-evidence
//! map per framework, and reports how much of a target framework is already
//! covered by the evidence collected for others.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod chart;
mod config;
mod error;
mod input;
mod logging;
mod output;
mod report;

use chart::Bar;
use config::{CrosswalkConfig, FilterConfig, FilterTarget, SourceMode, DEFAULT_CONFIG_FILE};
use crosswalk::Comparison;
use error::{CliError, Result};
use report::Report;

/// Crosswalk - Compliance framework evidence coverage
#[derive(Parser)]
#[command(name = "crosswalk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to crosswalk.toml (defaults to ./crosswalk.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Input overrides shared by every command
#[derive(Args)]
struct SourceArgs {
    /// Input layout: wide or catalog
    #[arg(long, global = true)]
    mode: Option<String>,

    /// Wide table CSV (implies --mode wide)
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Control catalog CSV (implies --mode catalog)
    #[arg(long, global = true)]
    controls: Option<PathBuf>,

    /// Evidence-task catalog CSV (implies --mode catalog)
    #[arg(long, global = true)]
    evidence: Option<PathBuf>,

    /// First framework column of a wide table
    #[arg(long, global = true)]
    column_start: Option<usize>,

    /// Only use rows tagged with this category code
    #[arg(long, global = true)]
    filter: Option<String>,

    /// Column holding the category codes
    #[arg(long, global = true)]
    filter_column: Option<usize>,

    /// Catalog the filter applies to: controls or evidence
    #[arg(long, global = true)]
    filter_target: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify target frameworks against implemented frameworks
    Compare {
        /// Framework whose evidence is already collected (repeatable)
        #[arg(short, long = "implemented", required = true)]
        implemented: Vec<String>,

        /// Framework to investigate (repeatable)
        #[arg(short, long = "target", required = true)]
        target: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Breakdown file path (overrides configuration)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Don't write the breakdown file
        #[arg(long, conflicts_with = "report")]
        no_report: bool,

        /// Don't draw the bar chart
        #[arg(long)]
        no_chart: bool,
    },

    /// Compare two frameworks in both directions
    Cross {
        /// First framework
        a: String,

        /// Second framework
        b: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Also write a breakdown file for both directions
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the frameworks found in the input
    Frameworks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new crosswalk.toml
    Init {
        /// Input layout for the template: wide or catalog
        #[arg(long = "layout", default_value = "catalog")]
        layout: String,

        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

impl SourceArgs {
    /// Apply command-line overrides on top of file configuration
    fn apply(&self, config: &mut CrosswalkConfig) -> Result<()> {
        let original_mode = config.source.mode;
        if let Some(mode) = &self.mode {
            config.source.mode = parse_mode(mode)?;
        } else if self.table.is_some() {
            config.source.mode = SourceMode::Wide;
        } else if self.controls.is_some() || self.evidence.is_some() {
            config.source.mode = SourceMode::Catalog;
        }
        let mode_switched = config.source.mode != original_mode;

        if let Some(table) = &self.table {
            config.source.table = Some(table.clone());
        }
        if let Some(controls) = &self.controls {
            config.source.controls = Some(controls.clone());
        }
        if let Some(evidence) = &self.evidence {
            config.source.evidence = Some(evidence.clone());
        }
        if let Some(start) = self.column_start {
            config.wide.framework_column_start = start;
        }

        let default_target = match config.source.mode {
            SourceMode::Wide => FilterTarget::Evidence,
            SourceMode::Catalog => FilterTarget::Controls,
        };

        match &self.filter {
            Some(code) if code.is_empty() => {
                config.filter = None;
            }
            Some(code) => {
                let existing = config.filter.take();
                let column = self
                    .filter_column
                    .or(existing.as_ref().map(|f| f.column))
                    .ok_or_else(|| CliError::missing("filter.column (--filter-column)"))?;
                let target = match &self.filter_target {
                    Some(t) => parse_filter_target(t)?,
                    None if mode_switched => default_target,
                    None => existing.map_or(default_target, |f| f.target),
                };
                config.filter = Some(FilterConfig {
                    code: code.clone(),
                    column,
                    target,
                });
            }
            None => {
                if let Some(filter) = config.filter.as_mut() {
                    if let Some(column) = self.filter_column {
                        filter.column = column;
                    }
                    match &self.filter_target {
                        Some(target) => filter.target = parse_filter_target(target)?,
                        None if mode_switched => filter.target = default_target,
                        None => {}
                    }
                }
            }
        }

        Ok(())
    }
}

fn parse_mode(value: &str) -> Result<SourceMode> {
    SourceMode::parse(value).ok_or_else(|| {
        CliError::invalid("mode", format!("Unknown mode: {}. Use 'wide' or 'catalog'", value))
    })
}

fn parse_filter_target(value: &str) -> Result<FilterTarget> {
    match value.to_lowercase().as_str() {
        "controls" | "control" => Ok(FilterTarget::Controls),
        "evidence" => Ok(FilterTarget::Evidence),
        _ => Err(CliError::invalid(
            "filter.target",
            format!("Unknown target: {}. Use 'controls' or 'evidence'", value),
        )),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        verbose,
        source,
        command,
    } = cli;
    let load = || -> Result<CrosswalkConfig> {
        let mut config = CrosswalkConfig::load(config_path.as_deref())?;
        source.apply(&mut config)?;
        logging::init_tracing(&config.logging, verbose)?;
        Ok(config)
    };

    match command {
        Commands::Compare {
            implemented,
            target,
            json,
            report,
            no_report,
            no_chart,
        } => {
            let config = load()?;
            let breakdown = if no_report {
                None
            } else if report.is_some() {
                report
            } else if config.report.write_breakdown {
                Some(config.report.breakdown_path.clone())
            } else {
                None
            };
            cmd_compare(&config, &implemented, &target, json, breakdown, !no_chart)
        }

        Commands::Cross { a, b, json, report } => cmd_cross(&load()?, &a, &b, json, report),

        Commands::Frameworks { json } => cmd_frameworks(&load()?, json),

        Commands::Init { layout, force } => cmd_init(config_path.as_deref(), &layout, force),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_compare(
    config: &CrosswalkConfig,
    implemented: &[String],
    targets: &[String],
    json: bool,
    breakdown: Option<PathBuf>,
    chart: bool,
) -> Result<()> {
    let loaded = input::load_frameworks(config)?;
    let frameworks = &loaded.frameworks;

    let comparisons = targets
        .iter()
        .map(|target| {
            frameworks
                .compare(implemented, target)
                .map_err(|e| CliError::with_available(e, frameworks.labels()))
        })
        .collect::<Result<Vec<Comparison>>>()?;

    if json {
        output::print_json(&Report::new(&comparisons, loaded.join))?;
    } else {
        for comparison in &comparisons {
            output::print_comparison(comparison);
        }
        if chart {
            let bars: Vec<Bar> = comparisons.iter().map(Bar::for_target).collect();
            output::print_chart(
                "Collected controls by framework",
                &bars,
                config.report.chart_width,
            );
        }
        if let Some(stats) = loaded.join.filter(|s| !s.is_clean()) {
            output::print_join_stats(&stats);
        }
    }

    if let Some(path) = breakdown {
        report::write_breakdown(&path, &comparisons)?;
        if !json {
            println!();
            output::success(&format!("Wrote breakdown to {}", path.display()));
        }
    }

    Ok(())
}

fn cmd_cross(
    config: &CrosswalkConfig,
    a: &str,
    b: &str,
    json: bool,
    breakdown: Option<PathBuf>,
) -> Result<()> {
    let loaded = input::load_frameworks(config)?;
    let frameworks = &loaded.frameworks;

    let (a_to_b, b_to_a) = frameworks
        .cross_compare(a, b)
        .map_err(|e| CliError::with_available(e, frameworks.labels()))?;
    let comparisons = [a_to_b, b_to_a];

    if json {
        output::print_json(&Report::new(&comparisons, loaded.join))?;
    } else {
        for comparison in &comparisons {
            output::print_comparison(comparison);
        }
        let bars: Vec<Bar> = comparisons.iter().map(Bar::titled).collect();
        output::print_chart(
            "Collected controls by framework",
            &bars,
            config.report.chart_width,
        );
    }

    if let Some(path) = breakdown {
        report::write_breakdown(&path, &comparisons)?;
        if !json {
            println!();
            output::success(&format!("Wrote breakdown to {}", path.display()));
        }
    }

    Ok(())
}

fn cmd_frameworks(config: &CrosswalkConfig, json: bool) -> Result<()> {
    let loaded = input::load_frameworks(config)?;

    if json {
        output::print_json(&frameworks_json(&loaded))?;
    } else {
        output::print_banner();
        if loaded.frameworks.is_empty() {
            output::warning("No frameworks found in the input");
        } else {
            output::print_frameworks(&loaded.frameworks);
        }
        if let Some(stats) = &loaded.join {
            output::print_join_stats(stats);
        }
    }

    Ok(())
}

fn frameworks_json(loaded: &input::Loaded) -> serde_json::Value {
    serde_json::json!({
        "join": loaded.join,
        "frameworks": loaded.frameworks.iter().map(|f| {
            serde_json::json!({
                "label": f.label(),
                "controls": f.control_count(),
                "evidence_tasks": f.evidence_tasks().len(),
                "unmapped_controls": f.unmapped_controls().count(),
            })
        }).collect::<Vec<_>>(),
    })
}

fn cmd_init(config_path: Option<&Path>, layout: &str, force: bool) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if path.exists() && !force {
        return Err(CliError::invalid(
            "config",
            format!("{} already exists. Use --force to overwrite.", path.display()),
        ));
    }

    let mode = parse_mode(layout)?;
    std::fs::write(path, config::init_template(mode)).map_err(|e| CliError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    output::success(&format!("Created {}", path.display()));
    output::info("Point [source] at your exports and run 'crosswalk frameworks'");

    Ok(())
}
