//! Discrete spatial derivatives of an elevation raster.
//!
//! All derived fields use the analysis-space convention shared by the
//! rest of the pipeline: field row `v` reads storage row
//! `height - v - 1`, so analysis row 0 is the bottom row of the stored
//! image. Differencing starts at index 1 on both axes; row 0 and
//! column 0 of every output stay zero because no predecessor exists.

use crate::raster::Raster;

/// Horizontal and vertical backward differences at one sample.
pub type Slope = [f32; 2];

/// First derivative of a byte raster: each sample's difference against
/// the sample to its left and the sample above it (in analysis space).
pub fn gradient_of_raster(values: &Raster<u8>) -> Raster<Slope> {
    let width = values.width;
    let height = values.height;
    let samples = values.as_slice();
    let mut result = Raster::new_with(width, height, [0.0f32, 0.0]);

    for v in 1..height {
        for h in 1..width {
            let at = (height - v - 1) * width + h;
            let left = at - 1;
            // one storage row down is one analysis row up
            let up = at + width;

            let dh = samples[at] as f32 - samples[left] as f32;
            let dv = samples[at] as f32 - samples[up] as f32;
            result.set(h, v, [dh, dv]);
        }
    }
    result
}

/// Derivative of a slope field, componentwise: the horizontal component
/// differences against the left neighbor, the vertical against the one
/// below in analysis space.
pub fn gradient_of_field(field: &Raster<Slope>) -> Raster<Slope> {
    let width = field.width;
    let height = field.height;
    let mut result = Raster::new_with(width, height, [0.0f32, 0.0]);

    for v in 1..height {
        for h in 1..width {
            let dh = field.get(h, v)[0] - field.get(h - 1, v)[0];
            let dv = field.get(h, v)[1] - field.get(h, v - 1)[1];
            result.set(h, v, [dh, dv]);
        }
    }
    result
}

/// Curvature estimate: the gradient applied twice. This is the signal
/// roughness scoring runs on.
pub fn curvature(values: &Raster<u8>) -> Raster<Slope> {
    gradient_of_field(&gradient_of_raster(values))
}
