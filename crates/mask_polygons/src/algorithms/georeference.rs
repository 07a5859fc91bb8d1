use crate::{
    annotation::Ordinate,
    traits::PointMapper,
    types::{GeoTransform, PixelAnchor},
};

/// Keeps raw pixel indices
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelCoordinates;

impl PointMapper for PixelCoordinates {
    fn map_point(&self, col: u32, row: u32) -> [Ordinate; 2] {
        [col.into(), row.into()]
    }
}

/// Maps pixel indices to world coordinates through the raster's affine
/// transform
#[derive(Debug, Clone, Copy)]
pub struct WorldCoordinates {
    pub transform: GeoTransform,
    pub anchor: PixelAnchor,
}

impl WorldCoordinates {
    pub fn new(transform: GeoTransform, anchor: PixelAnchor) -> Self {
        Self { transform, anchor }
    }
}

impl PointMapper for WorldCoordinates {
    fn map_point(&self, col: u32, row: u32) -> [Ordinate; 2] {
        let [x, y] = self.transform.xy(f64::from(col), f64::from(row), self.anchor);
        [x.into(), y.into()]
    }
}
