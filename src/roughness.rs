//! Roughness scoring and LOD band assignment for analysis tiles.

use rayon::prelude::*;

use crate::gradient::Slope;
use crate::lod::{ANALYSIS_TILE, LOD_COUNT};
use crate::raster::Raster;

/// Lower score bounds for bands 0 through 3; anything below the last
/// entry (including every negative score) lands in band 4.
const BAND_THRESHOLDS: [f32; LOD_COUNT - 1] = [0.005, 0.001, 0.0005, 0.0001];

/// An analysis tile's top-left corner in analysis space plus its
/// roughness score.
#[derive(Clone, Copy, Debug)]
pub struct ScoredTile {
    pub h: usize,
    pub v: usize,
    pub score: f32,
}

/// Plain arithmetic mean of every component (both axes, sign kept)
/// inside one analysis window. The signed mean lets symmetric rough
/// terrain cancel toward zero; that behavior is part of the format.
fn tile_score(curvature: &Raster<Slope>, h0: usize, v0: usize) -> f32 {
    let mut sum = 0.0f64;
    for v in v0..v0 + ANALYSIS_TILE {
        for h in h0..h0 + ANALYSIS_TILE {
            let s = curvature.get(h, v);
            sum += s[0] as f64 + s[1] as f64;
        }
    }
    (sum / (ANALYSIS_TILE * ANALYSIS_TILE * 2) as f64) as f32
}

/// Partition the curvature field into whole analysis tiles and score
/// each. Tiles are enumerated row-major over analysis space so that
/// downstream packing positions are deterministic; the parallel map
/// preserves that order.
pub fn score_tiles(curvature: &Raster<Slope>) -> Vec<ScoredTile> {
    let mut origins = Vec::new();
    let mut v = 0;
    while v + ANALYSIS_TILE <= curvature.height {
        let mut h = 0;
        while h + ANALYSIS_TILE <= curvature.width {
            origins.push((h, v));
            h += ANALYSIS_TILE;
        }
        v += ANALYSIS_TILE;
    }

    origins
        .into_par_iter()
        .map(|(h, v)| ScoredTile {
            h,
            v,
            score: tile_score(curvature, h, v),
        })
        .collect()
}

/// Band index for a signed roughness score. Band 0 holds the roughest
/// tiles and gets the finest output resolution.
pub fn band_for_score(score: f32) -> usize {
    BAND_THRESHOLDS
        .iter()
        .position(|&threshold| score >= threshold)
        .unwrap_or(LOD_COUNT - 1)
}

/// Split scored tiles into the five bands, keeping enumeration order
/// within each band.
pub fn classify(tiles: &[ScoredTile]) -> [Vec<ScoredTile>; LOD_COUNT] {
    let mut bands: [Vec<ScoredTile>; LOD_COUNT] = Default::default();
    for &tile in tiles {
        bands[band_for_score(tile.score)].push(tile);
    }
    bands
}
