//! CLI output formatting for all pipeline stages.
//!
//! # Path-First Display
//!
//! Output is **path-centric**: every finding leads with the exact field path
//! it concerns (`sections[2].props.title`), because the reader's next action
//! is opening the configuration file and navigating to that field. Severity
//! is a line prefix, never a separate column, so output stays grep-friendly.
//!
//! ```text
//! error: defaultLanguage: must be one of the configured languages
//! error: sections[1].props: required field is missing: text
//! warning: sections[3].id: duplicate section id "hero" (first used by sections[0])
//! warning: seo: no SEO metadata configured
//! ```
//!
//! # Fetch output
//!
//! Each resolved URL gets one line: the URL, an arrow, the local path, and
//! size or status context in parens:
//!
//! ```text
//! https://cdn.example.com/hero.jpg → assets/hero.jpg (184 KB)
//! https://cdn.example.com/logo.svg → assets/logo.svg (cached)
//! https://cdn.example.com/404.png: failed (HTTP status 404)
//! 2 downloaded, 1 cached, 1 failed (4 unique urls, 5 references)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::assets::{AssetReport, FetchEvent};
use crate::issue::ValidationReport;

// ============================================================================
// Byte formatting
// ============================================================================

/// Human-readable byte count: bytes below 1 KB, otherwise KB or MB with one
/// decimal for MB.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// Validation output
// ============================================================================

/// Format a validation report: errors first, then warnings, then a summary.
pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();
    for issue in &report.errors {
        lines.push(format!("error: {issue}"));
    }
    for issue in &report.warnings {
        lines.push(format!("warning: {issue}"));
    }
    lines.push(match (report.errors.len(), report.warnings.len()) {
        (0, 0) => "Configuration is valid".to_string(),
        (0, w) => format!("Configuration is valid ({w} warnings)"),
        (e, 0) => format!("Configuration is invalid ({e} errors)"),
        (e, w) => format!("Configuration is invalid ({e} errors, {w} warnings)"),
    });
    lines
}

/// Print a validation report to stdout.
pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Fetch output
// ============================================================================

/// Format one fetch progress event as a display line.
pub fn format_fetch_event(event: &FetchEvent) -> String {
    match event {
        FetchEvent::Resolved {
            url,
            local_path,
            bytes,
            cached,
        } => {
            let detail = if *cached {
                "cached".to_string()
            } else {
                format_bytes(*bytes)
            };
            format!("{url} \u{2192} {local_path} ({detail})")
        }
        FetchEvent::Failed { url, message } => format!("{url}: failed ({message})"),
    }
}

/// Format the end-of-stage asset summary.
pub fn format_asset_summary(report: &AssetReport) -> Vec<String> {
    if report.resolved.is_empty() && report.errors.is_empty() {
        return vec!["No remote assets to resolve".to_string()];
    }
    vec![report.to_string()]
}

/// Print the asset summary to stdout.
pub fn print_asset_summary(report: &AssetReport) {
    for line in format_asset_summary(report) {
        println!("{line}");
    }
}
