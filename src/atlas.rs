//! Band-ordered atlas packing and the indirection raster.
//!
//! Tiles are laid into horizontal rows per band, bands stacked in
//! processing order from the bottom of the atlas upward. The
//! indirection raster records, for every tile-grid coordinate, where
//! its tile landed and at which band.

use crate::downsample::PackedTile;
use crate::lod::{atlas_width, ANALYSIS_TILE, DETAIL_SIZE, LOD_COUNT, SAMPLE_STRIDE};
use crate::raster::Raster;

/// The packed layout: per-band tiles chunked into atlas rows, plus the
/// total atlas height they occupy.
pub struct PackedHeightmap {
    pub map_width: usize,
    pub map_height: usize,
    /// Total atlas height in samples across all non-empty bands.
    pub pixel_height: usize,
    rows: [Vec<Vec<PackedTile>>; LOD_COUNT],
}

/// Chunk each band's tiles into atlas rows. Row capacity is the atlas
/// width divided by the band's tile side, capped at one tile per
/// indirection column. Empty bands occupy no height.
pub fn pack(
    bands: [Vec<PackedTile>; LOD_COUNT],
    map_width: usize,
    map_height: usize,
) -> PackedHeightmap {
    let max_columns = map_width / ANALYSIS_TILE;
    let width = atlas_width(map_width);

    let mut rows: [Vec<Vec<PackedTile>>; LOD_COUNT] = Default::default();
    let mut pixel_height = 0;

    for (band, tiles) in bands.into_iter().enumerate() {
        if tiles.is_empty() {
            continue;
        }
        let per_row = (width / DETAIL_SIZE[band]).min(max_columns);
        let chunked: Vec<Vec<PackedTile>> =
            tiles.chunks(per_row).map(|chunk| chunk.to_vec()).collect();
        pixel_height += chunked.len() * DETAIL_SIZE[band];
        rows[band] = chunked;
    }

    PackedHeightmap {
        map_width,
        map_height,
        pixel_height,
        rows,
    }
}

impl PackedHeightmap {
    pub fn rows_in_band(&self, band: usize) -> usize {
        self.rows[band].len()
    }

    pub fn tiles_in_band(&self, band: usize) -> usize {
        self.rows[band].iter().map(|row| row.len()).sum()
    }

    /// Rasterize the layout into the atlas and indirection rasters and
    /// record the vertical offset at which each non-empty band begins.
    /// Skipped bands keep offset 0.
    pub fn rasterize(&self) -> (Raster<u8>, Raster<[u8; 4]>, [usize; LOD_COUNT]) {
        let width = atlas_width(self.map_width);
        let h_tiles = self.map_width / ANALYSIS_TILE;
        let v_tiles = self.map_height / ANALYSIS_TILE;

        let mut atlas = Raster::new_with(width, self.pixel_height, 0u8);
        let mut indirection = Raster::new_with(h_tiles, v_tiles, [0u8; 4]);
        let mut offsets = [0usize; LOD_COUNT];

        let mut cursor = 0;
        for band in 0..LOD_COUNT {
            let side = DETAIL_SIZE[band];
            for (ri, row) in self.rows[band].iter().enumerate() {
                if ri == 0 {
                    offsets[band] = cursor;
                }
                cursor += side;
                // The first band fills the bottom of the top-origin atlas.
                let base_y = self.pixel_height - cursor;

                for (ci, tile) in row.iter().enumerate() {
                    let base_x = ci * side;
                    for ty in 0..side {
                        for tx in 0..side {
                            atlas.set(
                                base_x + tx,
                                base_y + ty,
                                tile.samples[ty * side + tx],
                            );
                        }
                    }
                    indirection.set(
                        tile.j,
                        v_tiles - tile.i - 1,
                        [ci as u8, ri as u8, SAMPLE_STRIDE[band] as u8, band as u8],
                    );
                }
            }
        }

        (atlas, indirection, offsets)
    }
}
