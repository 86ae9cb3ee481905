use std::env;
use std::fs;
use std::path::Path;
use svd_compress::config;
use svd_compress::image::io::{write_json_file, write_text_file};
use svd_compress::pipeline::{results_lines, run_batch, summary_table};
use svd_compress::CodecError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CodecError> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path))?;

    fs::create_dir_all(&config.output.dir)?;
    let inputs = config.collect_inputs()?;
    if inputs.is_empty() {
        return Err(CodecError::Config(
            "no input images (set `inputs`, `input_dir` or `generate_examples`)".to_string(),
        ));
    }

    let reports = run_batch(
        &inputs,
        &config.factors,
        &config.compress_options(),
        &config.output.dir,
    );

    println!("\nResults:");
    print!("{}", summary_table(&reports));

    let summary_path = config.output.summary_path();
    write_text_file(&summary_path, &results_lines(&reports))?;
    println!("Results written to {}", summary_path.display());

    if let Some(path) = config.output.report_json_path() {
        write_json_file(&path, &reports)?;
        println!("JSON report written to {}", path.display());
    }

    println!("All artifacts in {}", config.output.dir.display());
    Ok(())
}

fn usage() -> CodecError {
    CodecError::Config("Usage: svd_batch <config.json>".to_string())
}
