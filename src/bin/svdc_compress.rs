use std::env;
use std::path::Path;
use svd_compress::codec::{CompressOptions, DecompositionStrategy};
use svd_compress::image::io::load_raster;
use svd_compress::metrics::compression_ratio;
use svd_compress::pipeline::compress_to_file;
use svd_compress::CodecError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CodecError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (input, output, factor) = match args.as_slice() {
        [input, output, factor] | [input, output, factor, _] => (input, output, factor),
        _ => return Err(usage()),
    };
    let factor: f64 = factor
        .parse()
        .map_err(|_| CodecError::Config(format!("invalid compression factor {factor:?}")))?;
    let strategy = match args.get(3).map(String::as_str) {
        None | Some("full") => DecompositionStrategy::Full,
        Some("randomized") => DecompositionStrategy::randomized(0),
        Some(_) => return Err(usage()),
    };

    let image = load_raster(Path::new(input))?;
    let options = CompressOptions::new().with_strategy(strategy);
    let summary = compress_to_file(&image, factor, &options, Path::new(output))?;

    println!(
        "Compressed {input} ({}x{} {}): k={}, {} -> {} bytes, ratio={:.2}x",
        image.rows(),
        image.cols(),
        image.mode(),
        summary.k,
        summary.raw_size,
        summary.container_size,
        compression_ratio(summary.raw_size, summary.container_size)
    );
    Ok(())
}

fn usage() -> CodecError {
    CodecError::Config(
        "Usage: svdc_compress <image> <out.svc> <factor> [full|randomized]".to_string(),
    )
}
