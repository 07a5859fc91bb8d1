//! # Mask Polygon Annotation Library
//!
//! Converts binary segmentation masks into LabelMe-style polygon annotation
//! documents, and loads those documents back into a table of polygons.
//!
//! ## Core Features
//!
//! - **External contours**: one polygon per connected foreground region, holes ignored
//! - **Pixel or world coordinates**: GeoTIFF affine transforms map pixels to map units
//! - **Annotation documents**: the labeling tool's JSON schema, written with 4-space indentation
//! - **Geometry tables**: `(Polygon, label)` rows with GeoJSON export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! // Pixel coordinates, writes scene.json next to scene.tif
//! let output = mask_polygons::vectorize("mask.png", "scene.tif", "building", false)?;
//!
//! let table = mask_polygons::load(&output)?;
//! for row in &table {
//!     println!("{}: {:?}", row.label, row.geometry);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Vectorizer
//!
//! ```rust,no_run
//! use mask_polygons::{ContourApproximation, OutputPathPolicy, PixelAnchor, Vectorizer};
//!
//! let vectorizer = Vectorizer::builder("field")
//!     .geo(true)
//!     .anchor(PixelAnchor::UpperLeft)
//!     .approximation(ContourApproximation::None)
//!     .output_policy(OutputPathPolicy::LegacyTifSubstring)
//!     .build();
//! vectorizer.vectorize("mask.tif", "scene.tif")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod annotation;
pub mod pipeline;
pub mod io;
pub mod table;
pub mod command;
pub mod typed_geojson;

// Re-exports for convenience
pub use error::{MaskError, Result};
pub use types::{Contour, GeoTransform, Mask, PixelAnchor};
pub use traits::*;
pub use algorithms::*;
pub use annotation::{AnnotationDocument, Ordinate, Shape};
pub use pipeline::{Vectorizer, builder::VectorizerBuilder};
pub use io::{load_geo_mask, load_mask, read_document, write_document, GeoRaster, OutputPathPolicy};
pub use table::{load, GeometryRow, GeometryTable, MIN_POLYGON_POINTS};
pub use command::{CommandOutcome, ConversionCommand, LoadParams, VectorizeParams};

/// Vectorize `mask_source` with default settings and write the annotation
/// document for `image_path`. With `geo`, points are world coordinates of
/// pixel centers. Returns the written path.
pub fn vectorize<M, I>(mask_source: M, image_path: I, label: &str, geo: bool) -> Result<PathBuf>
where
    M: AsRef<Path>,
    I: AsRef<Path>,
{
    Vectorizer::builder(label)
        .geo(geo)
        .build()
        .vectorize(mask_source, image_path)
}
