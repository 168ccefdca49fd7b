//! Output serialization for the external renderer.
//!
//! Three artifacts land under `map_data/`: the packed atlas (8-bit
//! grayscale PNG), the indirection raster (8-bit RGBA PNG), and a small
//! text manifest. The manifest's field order and literal tokens are a
//! wire contract with the consumer and must not change.

use std::fs;
use std::path::Path;

use image::{GrayImage, RgbaImage};

use crate::error::PackError;
use crate::lod::{DETAIL_SIZE, LOD_COUNT};
use crate::raster::Raster;

pub const MAP_DATA_DIR: &str = "map_data";
pub const ATLAS_FILE: &str = "packed_heightmap.png";
pub const INDIRECTION_FILE: &str = "indirection_heightmap.png";
pub const MANIFEST_FILE: &str = "heightmap.heightmap";

/// Write all three artifacts under `<output_dir>/map_data/`.
pub fn write_outputs(
    output_dir: &Path,
    atlas: &Raster<u8>,
    indirection: &Raster<[u8; 4]>,
    level_offsets: &[usize; LOD_COUNT],
    map_width: usize,
    map_height: usize,
) -> Result<(), PackError> {
    let dir = output_dir.join(MAP_DATA_DIR);
    fs::create_dir_all(&dir).map_err(|source| PackError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    // An all-empty tile set yields a zero-height atlas, which is legal
    // but not encodable as PNG; pad it to a single blank row.
    let atlas_height = atlas.height.max(1);
    let mut atlas_pixels = atlas.as_slice().to_vec();
    atlas_pixels.resize(atlas.width * atlas_height, 0);
    let atlas_image = GrayImage::from_raw(atlas.width as u32, atlas_height as u32, atlas_pixels)
        .expect("atlas buffer length matches its dimensions");
    let atlas_path = dir.join(ATLAS_FILE);
    atlas_image
        .save(&atlas_path)
        .map_err(|source| PackError::WriteImage {
            path: atlas_path,
            source,
        })?;

    let mut rgba = Vec::with_capacity(indirection.width * indirection.height * 4);
    for (_, _, px) in indirection.iter() {
        rgba.extend_from_slice(px);
    }
    let indirection_image =
        RgbaImage::from_raw(indirection.width as u32, indirection.height as u32, rgba)
            .expect("indirection buffer length matches its dimensions");
    let indirection_path = dir.join(INDIRECTION_FILE);
    indirection_image
        .save(&indirection_path)
        .map_err(|source| PackError::WriteImage {
            path: indirection_path,
            source,
        })?;

    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, render_manifest(map_width, map_height, level_offsets)).map_err(
        |source| PackError::WriteManifest {
            path: manifest_path,
            source,
        },
    )?;

    Ok(())
}

fn render_manifest(
    map_width: usize,
    map_height: usize,
    level_offsets: &[usize; LOD_COUNT],
) -> String {
    let offsets = level_offsets
        .iter()
        .map(|offset| format!("{{ 0 {} }}", offset))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "heightmap_file=\"{MAP_DATA_DIR}/{ATLAS_FILE}\"\n\
         indirection_file=\"{MAP_DATA_DIR}/{INDIRECTION_FILE}\"\n\
         original_heightmap_size={{ {map_width} {map_height} }}\n\
         tile_size={tile_size}\n\
         should_wrap_x=no\n\
         level_offsets={{ {offsets} }}\n\
         max_compress_level={max_level}\n\
         empty_tile_offset={{ 255 127 }}\n",
        tile_size = DETAIL_SIZE[0],
        max_level = LOD_COUNT - 1,
    )
}
