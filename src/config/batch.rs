use crate::codec::{CompressOptions, DecompositionStrategy};
use crate::error::{CodecError, Result};
use crate::synthetic::write_example_images;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions picked up when scanning `input_dir`.
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "png", "pgm", "pbm", "tif", "tiff"];

#[derive(Debug, Deserialize)]
pub struct BatchConfig {
    /// Explicit image paths, processed first and in order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Directory scanned (non-recursively, sorted by name) for images.
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    /// Target compression factors tried for every image.
    #[serde(default = "default_factors")]
    pub factors: Vec<f64>,
    /// Synthesize the example images when no input is found.
    #[serde(default)]
    pub generate_examples: bool,
    #[serde(default)]
    pub decomposition: DecompositionStrategy,
    pub output: BatchOutputConfig,
}

fn default_factors() -> Vec<f64> {
    vec![2.0, 4.0, 8.0]
}

#[derive(Debug, Deserialize)]
pub struct BatchOutputConfig {
    /// Containers and reconstructions land here.
    pub dir: PathBuf,
    /// Results text file, relative to `dir` unless absolute.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,
    /// Optional JSON dump of every report, relative to `dir` unless absolute.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

fn default_summary_file() -> PathBuf {
    PathBuf::from("summary.txt")
}

impl BatchOutputConfig {
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    pub fn report_json_path(&self) -> Option<PathBuf> {
        self.report_json.as_ref().map(|p| self.dir.join(p))
    }
}

impl BatchConfig {
    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions::new().with_strategy(self.decomposition)
    }

    /// Explicit inputs followed by the images found in `input_dir`.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = self.inputs.clone();
        if let Some(dir) = &self.input_dir {
            if dir.is_dir() {
                let mut found = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let path = entry?.path();
                    if path.is_file() && has_image_extension(&path) {
                        found.push(path);
                    }
                }
                found.sort();
                inputs.extend(found);
            }
        }
        Ok(inputs)
    }

    /// [`resolve_inputs`](Self::resolve_inputs), or freshly generated example
    /// images when `generate_examples` is set and none of the inputs exists.
    ///
    /// Missing entries are passed through; the batch records them as failures.
    pub fn collect_inputs(&self) -> Result<Vec<PathBuf>> {
        let listed = self.resolve_inputs()?;
        if self.generate_examples && !listed.iter().any(|p| p.exists()) {
            let dir = self.examples_dir();
            info!("generating example images in {}", dir.display());
            return write_example_images(dir);
        }
        Ok(listed)
    }

    /// Where generated examples are written.
    pub fn examples_dir(&self) -> &Path {
        self.input_dir.as_deref().unwrap_or(self.output.dir.as_path())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

pub fn load_config(path: &Path) -> Result<BatchConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| CodecError::Config(format!("failed to read {}: {e}", path.display())))?;
    let config: BatchConfig = serde_json::from_str(&data)
        .map_err(|e| CodecError::Config(format!("failed to parse {}: {e}", path.display())))?;
    if let Some(bad) = config.factors.iter().find(|n| !n.is_finite() || **n <= 0.0) {
        return Err(CodecError::Config(format!(
            "{}: compression factor {bad} must be finite and > 0",
            path.display()
        )));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("batch.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{ "output": { "dir": "out" } }"#);
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.factors, vec![2.0, 4.0, 8.0]);
        assert_eq!(cfg.decomposition, DecompositionStrategy::Full);
        assert!(!cfg.generate_examples);
        assert_eq!(cfg.output.summary_path(), PathBuf::from("out/summary.txt"));
        assert!(cfg.output.report_json_path().is_none());
        assert_eq!(cfg.examples_dir(), Path::new("out"));
    }

    #[test]
    fn randomized_strategy_and_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            r#"{
                "factors": [3],
                "decomposition": { "strategy": "randomized", "oversample": 4, "seed": 11 },
                "output": { "dir": "out", "report_json": "report.json" }
            }"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(
            cfg.compress_options().strategy,
            DecompositionStrategy::Randomized {
                oversample: 4,
                power_iterations: 2,
                seed: 11
            }
        );
        assert_eq!(
            cfg.output.report_json_path(),
            Some(PathBuf::from("out/report.json"))
        );
    }

    #[test]
    fn input_dir_is_scanned_for_images() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        for name in ["b.bmp", "a.PNG", "notes.txt"] {
            fs::write(images.join(name), b"").unwrap();
        }
        let body = format!(
            r#"{{ "inputs": ["first.bmp"], "input_dir": {:?}, "output": {{ "dir": "out" }} }}"#,
            images.display().to_string()
        );
        let cfg = load_config(&write(dir.path(), &body)).unwrap();
        let inputs = cfg.resolve_inputs().unwrap();
        assert_eq!(
            inputs,
            vec![
                PathBuf::from("first.bmp"),
                images.join("a.PNG"),
                images.join("b.bmp")
            ]
        );
    }

    fn config_with_inputs(dir: &Path, inputs: &[PathBuf], generate: bool) -> BatchConfig {
        let listed: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
        let body = format!(
            r#"{{ "inputs": {listed:?}, "generate_examples": {generate}, "output": {{ "dir": {:?} }} }}"#,
            dir.join("out").display().to_string()
        );
        load_config(&write(dir, &body)).unwrap()
    }

    #[test]
    fn existing_inputs_are_kept_alongside_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.bmp");
        fs::write(&present, b"").unwrap();
        let inputs = vec![present, dir.path().join("absent.bmp")];

        let cfg = config_with_inputs(dir.path(), &inputs, true);
        assert_eq!(cfg.collect_inputs().unwrap(), inputs);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn examples_are_generated_only_when_no_input_exists() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("absent.bmp")];

        let cfg = config_with_inputs(dir.path(), &inputs, false);
        assert_eq!(cfg.collect_inputs().unwrap(), inputs);

        let cfg = config_with_inputs(dir.path(), &inputs, true);
        let generated = cfg.collect_inputs().unwrap();
        assert_eq!(generated.len(), 3);
        assert!(generated
            .iter()
            .all(|p| p.exists() && p.starts_with(dir.path().join("out"))));
    }

    #[test]
    fn non_positive_factor_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{ "factors": [2, 0], "output": { "dir": "o" } }"#);
        assert_eq!(load_config(&path).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "{ not json");
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("batch.json"));
    }
}
