//! Sequential batch over (image, target factor) combinations.
//!
//! Every combination produces exactly one [`MetricsReport`]. Failures are
//! recorded and the run moves on to the next combination.

use super::evaluate;
use crate::codec::CompressOptions;
use crate::error::CodecError;
use crate::image::io::load_raster;
use crate::metrics::MetricsReport;
use log::{info, warn};
use std::path::Path;

/// Run every factor against every input image, in order.
pub fn run_batch<P: AsRef<Path>>(
    inputs: &[P],
    factors: &[f64],
    options: &CompressOptions,
    out_dir: &Path,
) -> Vec<MetricsReport> {
    let mut reports = Vec::with_capacity(inputs.len() * factors.len());
    for input in inputs {
        let path = input.as_ref();
        let name = display_name(path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());

        info!("processing {name}");
        let image = match load_raster(path) {
            Ok(image) => image,
            Err(err) => {
                warn!("{name}: {err}");
                reports.extend(factors.iter().map(|&n| MetricsReport::failed(&name, n, &err)));
                continue;
            }
        };

        for &factor in factors {
            let report = match evaluate(&image, &stem, factor, options, out_dir) {
                Ok(stats) => {
                    info!(
                        "{name} N={factor}: k={} ratio={:.2}x psnr={:.2} dB",
                        stats.k, stats.ratio, stats.psnr
                    );
                    MetricsReport::compressed(&name, factor, stats)
                }
                Err(err) => record_failure(&name, factor, &err),
            };
            reports.push(report);
        }
    }
    reports
}

fn record_failure(name: &str, factor: f64, err: &CodecError) -> MetricsReport {
    warn!("{name} N={factor}: {err}");
    MetricsReport::failed(name, factor, err)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
