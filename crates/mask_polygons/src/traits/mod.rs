use crate::{
    annotation::Ordinate,
    error::Result,
    types::{Contour, Mask},
};

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract the outer boundary of every connected foreground region
    fn extract_contours(&self, mask: &Mask) -> Result<Vec<Contour>>;
}

/// Trait for contour approximation (point reduction) algorithms
pub trait ContourApproximator: Send + Sync {
    /// Reduce a closed contour to the points that define its shape
    fn approximate(&self, contour: &[[u32; 2]]) -> Contour;
}

/// Trait for mapping contour pixels into the coordinate space written to the
/// annotation document
pub trait PointMapper: Send + Sync {
    fn map_point(&self, col: u32, row: u32) -> [Ordinate; 2];
}
