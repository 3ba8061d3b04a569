//! Kisan CLI
//!
//! Operational commands for the registration portal.

use kisan_services::DiagnosticReport;

/// Render a diagnostic report as one line per step.
pub fn render_report(report: &DiagnosticReport) -> String {
    let mut lines: Vec<String> = report
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mark = if step.passed { "ok" } else { "FAILED" };
            format!("{}. {:<20} {:<6} {}", i + 1, step.name, mark, step.detail)
        })
        .collect();

    lines.push(String::new());
    lines.push(if report.is_healthy() {
        "All checks passed. Document uploads should work.".to_string()
    } else {
        "Storage check failed.".to_string()
    });
    lines.join("\n")
}
