//! Human-readable report rendering

use crate::output::{bytes_to_mb, PageWeightReport, ResourceEntry};

/// Renders a report as plain text
///
/// # Arguments
///
/// * `url` - The URL the report was computed for
/// * `report` - The report to render
/// * `show_breakdown` - List individual resources when the report carries them
pub fn format_report(url: &str, report: &PageWeightReport, show_breakdown: bool) -> String {
    let bytes = report.bytes();
    let mut out = format!("=== Page Weight: {} ===\n\n", url);

    out.push_str(&size_line("HTML:", report.html_size_mb(), bytes.html, ""));
    out.push_str(&size_line(
        "Images:",
        report.images_size_mb(),
        bytes.images,
        "",
    ));
    out.push_str(&size_line("CSS:", report.css_size_mb(), bytes.css, ""));
    out.push_str(&size_line("JS:", report.js_size_mb(), bytes.js, ""));
    out.push_str(&size_line(
        "Inline:",
        bytes_to_mb(bytes.inline),
        bytes.inline,
        "",
    ));
    out.push_str(&size_line(
        "External:",
        report.external_size_mb(),
        bytes.external,
        ", included above",
    ));
    out.push_str(&size_line(
        "Total:",
        report.total_size_mb(),
        bytes.total,
        "",
    ));

    if report.failed_resources() > 0 {
        out.push_str(&format!(
            "\n  Failed resources (counted as 0): {}\n",
            report.failed_resources()
        ));
    }

    if show_breakdown {
        if let Some(breakdown) = report.breakdown() {
            for (title, entries) in [
                ("Images", &breakdown.images),
                ("CSS", &breakdown.css),
                ("JS", &breakdown.js),
                ("External", &breakdown.external_resources),
            ] {
                out.push_str(&format_section(title, entries));
            }
        }
    }

    out
}

/// Prints a report to stdout
pub fn print_report(url: &str, report: &PageWeightReport, show_breakdown: bool) {
    print!("{}", format_report(url, report, show_breakdown));
}

fn size_line(label: &str, size_mb: f64, size_bytes: u64, note: &str) -> String {
    format!(
        "  {:<10}{:>8.2} MB ({} bytes{})\n",
        label, size_mb, size_bytes, note
    )
}

fn format_section(title: &str, entries: &[ResourceEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut section = format!("\n{} ({}):\n", title, entries.len());
    for entry in entries {
        section.push_str(&format!("  {:>10}  {}\n", entry.size, entry.url));
    }
    section
}
