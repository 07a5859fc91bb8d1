use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaskError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Failed to decode raster: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Raster has no usable affine transform: {}", .0.display())]
    MissingGeoTransform(PathBuf),

    #[error("Unsupported raster layout: {0}")]
    UnsupportedRaster(String),

    #[error("Annotation document is missing the `{0}` key")]
    MissingKey(&'static str),

    #[error("Cannot derive an output path distinct from {}", .0.display())]
    InvalidOutputPath(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MaskError>;
