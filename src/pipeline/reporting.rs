//! Plain-text rendering of batch reports: the console table and the results file.

use crate::metrics::{MetricsReport, Outcome};
use std::fmt::Write;

/// Fixed-width table of every report, with `ERROR` rows for failed combinations.
pub fn summary_table(reports: &[MetricsReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:14} | {:>4} | {:>5} | {:>7} | {:>8} | {:>6}",
        "Image", "N", "k", "Ratio", "MSE", "PSNR"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
    for report in reports {
        let _ = match &report.outcome {
            Outcome::Compressed(s) => writeln!(
                out,
                "{:14} | {:>4} | {:>5} | {:>6.1}x | {:>8.2} | {:>6.2}",
                report.image, report.factor, s.k, s.ratio, s.mse, s.psnr
            ),
            Outcome::Failed { .. } => writeln!(
                out,
                "{:14} | {:>4} | {:>5} | {:>7} | {:>8} | {:>6}",
                report.image, report.factor, "ERROR", "-", "-", "-"
            ),
        };
    }
    out
}

/// One line per successful combination: `<image> N=<n>: k=<k>, ratio=<r>x`.
pub fn results_lines(reports: &[MetricsReport]) -> String {
    let mut out = String::from("Results summary\n");
    for report in reports {
        if let Some(s) = report.stats() {
            let _ = writeln!(
                out,
                "{} N={}: k={}, ratio={:.1}x",
                report.image, report.factor, s.k, s.ratio
            );
        }
    }
    out
}
