use std::path::PathBuf;
use std::process;

use clap::Parser;

use heightmap_packer::lod::{DETAIL_SIZE, LOD_COUNT, SAMPLE_STRIDE};
use heightmap_packer::pipeline::{pack_heightmap, PackOptions};

#[derive(Parser, Debug)]
#[command(name = "heightmap_packer")]
#[command(about = "Pack an elevation raster into a multi-resolution heightmap atlas")]
struct Args {
    /// Path to the source elevation raster (8-bit grayscale)
    #[arg(short, long, default_value = "map_data/heightmap.png")]
    input: PathBuf,

    /// Directory that will receive the map_data outputs
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Declared map width in pixels (must be a multiple of 32)
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Declared map height in pixels (must be a multiple of 32)
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Packing heightmap: {}", args.input.display());
    println!("Map size: {}x{}", args.width, args.height);

    let options = PackOptions {
        input: args.input,
        output_dir: args.output_dir.clone(),
        map_width: args.width,
        map_height: args.height,
    };

    match pack_heightmap(&options) {
        Ok(summary) => {
            for band in 0..LOD_COUNT {
                if summary.tiles_per_band[band] == 0 {
                    continue;
                }
                println!(
                    "  Band {} ({}px tiles, stride {:>2}): {} tiles in {} rows",
                    band,
                    DETAIL_SIZE[band],
                    SAMPLE_STRIDE[band],
                    summary.tiles_per_band[band],
                    summary.rows_per_band[band]
                );
            }
            println!(
                "Atlas: {}x{} pixels",
                summary.atlas_width, summary.atlas_height
            );
            println!("Wrote map_data outputs to {}", args.output_dir.display());
        }
        Err(e) => {
            eprintln!("Packing failed: {}", e);
            process::exit(1);
        }
    }
}
