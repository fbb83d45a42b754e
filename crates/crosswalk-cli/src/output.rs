//! Output formatting and display utilities
//!
//! Provides colored, formatted output for the CLI

use colored::{ColoredString, Colorize};

use crosswalk::{Comparison, CoverageStatus, FrameworkSet, JoinStats};

use crate::chart::{self, Bar};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", msg.bold().underline());
}

/// Print a subheader
pub fn subheader(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Color for a coverage state
fn paint(text: &str, status: CoverageStatus) -> ColoredString {
    match status {
        CoverageStatus::Collected => text.green(),
        CoverageStatus::Partial => text.truecolor(0xf5, 0x95, 0x42),
        CoverageStatus::Outstanding => text.truecolor(0xf5, 0x42, 0x4e),
    }
}

/// Print counts and the collected percentage for one comparison
pub fn print_comparison(comparison: &Comparison) {
    header(&comparison.title());
    println!(
        "{}",
        format!(
            "{} evidence task(s) implemented by {}",
            comparison.implemented_tasks,
            comparison.implemented.join(", ")
        )
        .dimmed()
    );
    println!();

    let summary = comparison.summary();
    println!("{}", summary);

    if !summary.percentage.is_defined() {
        warning(&format!("{} has no controls", comparison.target));
    }
    if summary.unmapped > 0 {
        info(&format!(
            "{} collected control(s) have no evidence mapped",
            summary.unmapped
        ));
    }
}

/// Print the frameworks that were built
pub fn print_frameworks(frameworks: &FrameworkSet) {
    header(&format!("Frameworks ({})", frameworks.len()));

    let width = frameworks.labels().map(str::len).max().unwrap_or(0);
    for framework in frameworks {
        println!(
            "  {:<width$}  {:>5} controls  {:>5} evidence tasks",
            framework.label().bold(),
            framework.control_count(),
            framework.evidence_tasks().len(),
            width = width,
        );
    }
}

/// Print how the evidence catalog joined onto the control catalog
pub fn print_join_stats(stats: &JoinStats) {
    subheader("Catalog join:");
    println!("  Control rows:  {}", stats.control_rows);
    println!("  Evidence rows: {}", stats.evidence_rows);
    println!("  Assignments:   {}", stats.assignments);
    if stats.filtered_rows > 0 {
        println!("  Filtered out:  {}", stats.filtered_rows);
    }
    if !stats.is_clean() {
        warning(&format!(
            "Skipped {} unknown framework and {} unknown control reference(s)",
            stats.unknown_frameworks, stats.unknown_controls
        ));
    }
}

/// Print stacked bars on a shared scale
pub fn print_chart(title: &str, bars: &[Bar], width: usize) {
    subheader(title);

    let max_total = chart::max_total(bars);
    let label_width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);

    for bar in bars {
        let widths = chart::segment_widths(&bar.summary, max_total, width);
        let mut line = String::new();
        let mut counts = Vec::new();
        for (status, w) in CoverageStatus::ALL.into_iter().zip(widths) {
            line.push_str(&paint(&"█".repeat(w), status).to_string());
            counts.push(paint(&bar.count(status).to_string(), status).to_string());
        }
        println!(
            "  {:>label_width$} │{} {} {}",
            bar.label,
            line,
            counts.join("/"),
            format!("of {}", bar.summary.total).dimmed(),
            label_width = label_width,
        );
    }

    let legend: Vec<String> = CoverageStatus::ALL
        .into_iter()
        .map(|status| format!("{} {}", paint("■", status), status.name()))
        .collect();
    println!("  {:>label_width$}  {}", "", legend.join("  "), label_width = label_width);
}

/// Print the CLI banner
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{}", format!("Crosswalk v{}", version).bold());
    println!("{}", "Compliance Framework Evidence Coverage".dimmed());
}

/// Print a JSON report
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
