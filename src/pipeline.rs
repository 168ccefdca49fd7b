//! Single-pass packing pipeline: load, analyze, downsample, pack, write.
//!
//! The compute stages are pure and synchronous; file I/O happens only at
//! the ends. Gradient scoring and tile downsampling fan out across
//! threads, but tile order is fixed before packing, so output bytes are
//! identical regardless of worker scheduling.

use std::path::PathBuf;

use log::info;
use rayon::prelude::*;

use crate::atlas::{self, PackedHeightmap};
use crate::downsample::{downsample_tile, PackedTile};
use crate::error::PackError;
use crate::gradient;
use crate::lod::{ANALYSIS_TILE, LOD_COUNT};
use crate::manifest;
use crate::raster::Raster;
use crate::roughness;

/// Where to read the elevation raster and where to put the outputs.
#[derive(Clone, Debug)]
pub struct PackOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Declared map width in pixels; the input raster must match.
    pub map_width: usize,
    /// Declared map height in pixels; the input raster must match.
    pub map_height: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("map_data/heightmap.png"),
            output_dir: PathBuf::from("."),
            map_width: 512,
            map_height: 512,
        }
    }
}

/// Statistics from one packing run, for reporting.
#[derive(Clone, Debug, Default)]
pub struct PackSummary {
    pub tiles_per_band: [usize; LOD_COUNT],
    pub rows_per_band: [usize; LOD_COUNT],
    pub atlas_width: usize,
    pub atlas_height: usize,
}

/// Run the compute stages on an in-memory elevation raster: curvature,
/// classification, per-tile downsampling, packing. No file I/O.
pub fn build_packed(elevation: &Raster<u8>) -> PackedHeightmap {
    let curvature = gradient::curvature(elevation);

    let scored = roughness::score_tiles(&curvature);
    let bands = roughness::classify(&scored);
    info!(
        "classified {} analysis tiles: {:?} per band",
        scored.len(),
        bands.iter().map(|b| b.len()).collect::<Vec<_>>()
    );

    let mut packed_bands: [Vec<PackedTile>; LOD_COUNT] = Default::default();
    for (band, tiles) in bands.iter().enumerate() {
        packed_bands[band] = tiles
            .par_iter()
            .map(|tile| downsample_tile(elevation, tile.h, tile.v, band))
            .collect();
    }

    atlas::pack(packed_bands, elevation.width, elevation.height)
}

/// Full run: validate, load the raster, pack it, write the artifacts.
pub fn pack_heightmap(options: &PackOptions) -> Result<PackSummary, PackError> {
    if options.map_width == 0
        || options.map_height == 0
        || options.map_width % ANALYSIS_TILE != 0
        || options.map_height % ANALYSIS_TILE != 0
    {
        return Err(PackError::UnalignedDimensions {
            width: options.map_width,
            height: options.map_height,
            tile: ANALYSIS_TILE,
        });
    }

    let elevation = load_elevation(options)?;
    info!(
        "loaded {}x{} elevation raster from {}",
        elevation.width,
        elevation.height,
        options.input.display()
    );

    let packed = build_packed(&elevation);
    let (atlas_raster, indirection, offsets) = packed.rasterize();
    info!(
        "packed atlas is {}x{} samples",
        atlas_raster.width, atlas_raster.height
    );

    manifest::write_outputs(
        &options.output_dir,
        &atlas_raster,
        &indirection,
        &offsets,
        options.map_width,
        options.map_height,
    )?;

    let mut summary = PackSummary {
        atlas_width: atlas_raster.width,
        atlas_height: atlas_raster.height,
        ..Default::default()
    };
    for band in 0..LOD_COUNT {
        summary.tiles_per_band[band] = packed.tiles_in_band(band);
        summary.rows_per_band[band] = packed.rows_in_band(band);
    }
    Ok(summary)
}

fn load_elevation(options: &PackOptions) -> Result<Raster<u8>, PackError> {
    let image = image::open(&options.input)
        .map_err(|source| PackError::ReadInput {
            path: options.input.clone(),
            source,
        })?
        .to_luma8();

    let (width, height) = (image.width() as usize, image.height() as usize);
    if width != options.map_width || height != options.map_height {
        return Err(PackError::DimensionMismatch {
            path: options.input.clone(),
            expected_width: options.map_width,
            expected_height: options.map_height,
            actual_width: width,
            actual_height: height,
        });
    }

    Ok(Raster::from_vec(width, height, image.into_raw()))
}
