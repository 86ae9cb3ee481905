use std::env;
use std::path::Path;
use svd_compress::codec::Container;
use svd_compress::image::io::save_raster;
use svd_compress::pipeline::decompress;
use svd_compress::CodecError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CodecError> {
    let input = env::args().nth(1).ok_or_else(usage)?;
    let output = env::args().nth(2).ok_or_else(usage)?;

    let container = Container::read_file(Path::new(&input))?;
    let image = decompress(&container)?;
    save_raster(&image, Path::new(&output))?;

    println!(
        "Decompressed {input} (v{}, {}, k={}) to {output} ({}x{})",
        container.version(),
        container.mode(),
        container.rank(),
        image.rows(),
        image.cols()
    );
    Ok(())
}

fn usage() -> CodecError {
    CodecError::Config("Usage: svdc_decompress <in.svc> <out image>".to_string())
}
