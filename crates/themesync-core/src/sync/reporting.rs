//! Sync operation reporting and statistics

use std::fmt::Write;

use super::SyncReport;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &SyncReport) -> String {
        let mut output = String::new();

        let title = capitalize(&report.operation.to_string());
        let _ = writeln!(output, "\n=== {title} Summary ===");
        let _ = writeln!(output, "Synced:   {}", report.succeeded());
        if report.compiled() > 0 {
            let _ = writeln!(output, "Compiled: {}", report.compiled());
        }

        let failures: Vec<_> = report.failures().collect();
        let _ = writeln!(output, "Failed:   {}", failures.len());

        if !failures.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", failures.len());
            for failure in failures {
                let _ = writeln!(output, "  - {failure}");
            }
        }

        let _ = writeln!(output, "\nTotal items: {}", report.items.len());

        if report.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
