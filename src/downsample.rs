//! Edge-aware box downsampling of analysis tiles.

use crate::lod::{ANALYSIS_TILE, DETAIL_SIZE, SAMPLE_STRIDE};
use crate::raster::Raster;

/// One downsampled tile, tagged with its tile-grid coordinate.
#[derive(Clone, Debug)]
pub struct PackedTile {
    /// Tile-grid row (analysis v divided by the analysis tile size).
    pub i: usize,
    /// Tile-grid column (analysis h divided by the analysis tile size).
    pub j: usize,
    /// `side * side` samples, row-major in storage orientation.
    pub samples: Vec<u8>,
}

/// Downsample the tile whose analysis-space origin is `(h0, v0)` to the
/// resolution of `band`.
///
/// Every output sample averages a `stride x stride` neighborhood of the
/// source centered on the corresponding source coordinate, accumulated
/// in f64 and truncated to a byte. Tiles on a map border keep only the
/// inward half of the neighborhood on that axis and halve the divisor
/// with it; the two axes are independent, so a corner tile halves the
/// divisor twice.
pub fn downsample_tile(
    elevation: &Raster<u8>,
    h0: usize,
    v0: usize,
    band: usize,
) -> PackedTile {
    let width = elevation.width;
    let height = elevation.height;
    let side = DETAIL_SIZE[band];
    let stride = SAMPLE_STRIDE[band];
    let half = stride as f64 / 2.0;
    let window = (stride * stride) as f64;

    // Analysis row v0 + ANALYSIS_TILE - 1 is storage row 0, so the tile
    // in the last analysis row touches the top of the stored image.
    let top = v0 + ANALYSIS_TILE == height;
    let bottom = v0 == 0;
    let left = h0 == 0;
    let right = h0 + ANALYSIS_TILE == width;

    let base_row = height - v0 - ANALYSIS_TILE;
    let values = elevation.as_slice();
    let mut samples = vec![0u8; side * side];

    for row in 0..side {
        let cr = (base_row + row * stride) as i64;
        for col in 0..side {
            let cc = (h0 + col * stride) as i64;

            let mut divisor = window;

            let mut r_from = (cr as f64 - half).floor() as i64;
            let mut r_to = (cr as f64 + half).floor() as i64;
            if top {
                r_from = cr;
                divisor /= 2.0;
            } else if bottom {
                r_to = cr;
                divisor /= 2.0;
            }

            let mut c_from = (cc as f64 - half).floor() as i64;
            let mut c_to = (cc as f64 + half).floor() as i64;
            if left {
                c_from = cc;
                divisor /= 2.0;
            } else if right {
                c_to = cc;
                divisor /= 2.0;
            }

            let mut sum = 0.0f64;
            for r in r_from..r_to {
                for c in c_from..c_to {
                    assert!(
                        r >= 0 && (r as usize) < height && c >= 0 && (c as usize) < width,
                        "downsample window escaped the raster at ({}, {}) \
                         for tile ({}, {}) band {}",
                        c,
                        r,
                        h0,
                        v0,
                        band
                    );
                    sum += values[r as usize * width + c as usize] as f64;
                }
            }
            samples[row * side + col] = (sum / divisor) as u8;
        }
    }

    PackedTile {
        i: v0 / ANALYSIS_TILE,
        j: h0 / ANALYSIS_TILE,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lod::LOD_COUNT;

    #[test]
    fn test_uniform_raster_survives_every_band_and_border() {
        // A halved window with a halved divisor still averages to the
        // uniform value, so every tile position must reproduce 77.
        let elevation = Raster::new_with(96, 96, 77u8);
        for band in 1..LOD_COUNT {
            for &(h0, v0) in &[(0, 0), (32, 32), (64, 64), (0, 64), (64, 0)] {
                let tile = downsample_tile(&elevation, h0, v0, band);
                assert!(
                    tile.samples.iter().all(|&s| s == 77),
                    "band {} tile ({}, {}) altered a flat input",
                    band,
                    h0,
                    v0
                );
            }
        }
    }

    #[test]
    fn test_interior_stride_two_averages_known_block() {
        // Elevation equals the storage row index; a stride-2 interior
        // window spans rows cr-1 and cr, so each output sample is the
        // truncated mean of two consecutive row values.
        let mut data = Vec::new();
        for row in 0..96u8 {
            for _col in 0..96 {
                data.push(row);
            }
        }
        let elevation = Raster::from_vec(96, 96, data);
        let tile = downsample_tile(&elevation, 32, 32, 1);

        // base storage row is 96 - 32 - 32 = 32; output row k samples
        // rows 31 + 2k and 32 + 2k, averaging to 31.5 + 2k.
        let side = DETAIL_SIZE[1];
        for row in 0..side {
            for col in 0..side {
                assert_eq!(tile.samples[row * side + col], (31 + 2 * row) as u8);
            }
        }
    }

    #[test]
    fn test_stride_one_interior_samples_previous_pixel() {
        let mut data = Vec::new();
        for row in 0..96u8 {
            for _col in 0..96 {
                data.push(row);
            }
        }
        let elevation = Raster::from_vec(96, 96, data);
        let tile = downsample_tile(&elevation, 32, 32, 0);

        // Stride 1 takes the single sample at (cr - 1, cc - 1).
        let side = DETAIL_SIZE[0];
        for row in 0..side {
            for col in 0..side {
                assert_eq!(tile.samples[row * side + col], (31 + row) as u8);
            }
        }
    }

    #[test]
    fn test_stride_two_averages_columns_too() {
        let mut data = Vec::new();
        for _row in 0..96 {
            for col in 0..96u8 {
                data.push(col);
            }
        }
        let elevation = Raster::from_vec(96, 96, data);
        let tile = downsample_tile(&elevation, 32, 32, 1);

        // Output column k averages source columns 31 + 2k and 32 + 2k;
        // the mean 31.5 + 2k truncates to 31 + 2k.
        let side = DETAIL_SIZE[1];
        for row in 0..side {
            for col in 0..side {
                assert_eq!(tile.samples[row * side + col], (31 + 2 * col) as u8);
            }
        }
    }

    #[test]
    fn test_border_divisors_halve_per_axis() {
        // Row values on a 96-wide map so (32, 0) touches only the bottom
        // border: the window keeps one source row instead of two and the
        // divisor drops from 4 to 2, leaving the row value itself.
        let mut data = Vec::new();
        for row in 0..96u8 {
            for _col in 0..96 {
                data.push(row);
            }
        }
        let elevation = Raster::from_vec(96, 96, data);

        let tile = downsample_tile(&elevation, 32, 0, 1);
        let side = DETAIL_SIZE[1];
        // base storage row is 96 - 0 - 32 = 64; output row k keeps only
        // source row 63 + 2k.
        for row in 0..side {
            assert_eq!(tile.samples[row * side], (63 + 2 * row) as u8);
        }

        // (0, 0) is a corner: one row, one column, divisor 1.
        let corner = downsample_tile(&elevation, 0, 0, 1);
        for row in 0..side {
            assert_eq!(corner.samples[row * side], (63 + 2 * row) as u8);
        }
    }

    #[test]
    fn test_tile_grid_tagging() {
        let elevation = Raster::new_with(96, 96, 0u8);
        let tile = downsample_tile(&elevation, 64, 32, 3);
        assert_eq!(tile.i, 1);
        assert_eq!(tile.j, 2);
        assert_eq!(tile.samples.len(), DETAIL_SIZE[3] * DETAIL_SIZE[3]);
    }
}
