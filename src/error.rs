//! Error types for the packing pipeline.
//!
//! Input and output failures are reported with enough context (path,
//! expected vs. actual dimensions) to diagnose without retry; broken
//! internal preconditions panic instead, since no partial output is
//! worth writing.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read elevation raster {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "elevation raster {} is {actual_width}x{actual_height}, \
         expected {expected_width}x{expected_height}",
        .path.display()
    )]
    DimensionMismatch {
        path: PathBuf,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("map dimensions {width}x{height} must be non-zero multiples of {tile}")]
    UnalignedDimensions {
        width: usize,
        height: usize,
        tile: usize,
    },

    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
