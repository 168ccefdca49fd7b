//! Fixed level-of-detail tables for the packed heightmap format.
//!
//! The external renderer understands exactly five bands; the tables
//! below are part of its wire contract and never vary per map.

/// Side length in samples of the square analysis window. Also the
/// downsampling ratio of the indirection raster relative to the map.
pub const ANALYSIS_TILE: usize = 32;

/// Number of LOD bands. Band 0 is finest, band 4 coarsest.
pub const LOD_COUNT: usize = 5;

/// Output tile side length in samples, per band.
pub const DETAIL_SIZE: [usize; LOD_COUNT] = [33, 17, 9, 5, 3];

/// Box-average sampling stride per band. A band-2 tile averages 4x4
/// source neighborhoods for every output sample.
pub const SAMPLE_STRIDE: [usize; LOD_COUNT] = [1, 2, 4, 8, 16];

/// Atlas width in samples for a map of the given width: one band-1 tile
/// per indirection column.
pub fn atlas_width(map_width: usize) -> usize {
    (map_width / ANALYSIS_TILE) * DETAIL_SIZE[1]
}
