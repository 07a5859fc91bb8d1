use geo::AffineTransform;
use geo_types::Coord;
use image::{GrayImage, ImageBuffer, Luma};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Boundary of one connected foreground region, as `[col, row]` pixel indices
/// in traversal order.
pub type Contour = Vec<[u32; 2]>;

/// A binary segmentation mask. Any nonzero source sample is foreground and is
/// stored as 255, background as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// Build a mask by evaluating `is_foreground(col, row)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, is_foreground: F) -> Self
    where
        F: Fn(u32, u32) -> bool,
    {
        let image = GrayImage::from_fn(width, height, |x, y| {
            if is_foreground(x, y) { Luma([255u8]) } else { Luma([0u8]) }
        });
        Self { image }
    }

    /// Build a mask from a 16-bit grayscale buffer
    pub fn from_luma16(buffer: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Self {
        Self::from_fn(buffer.width(), buffer.height(), |x, y| buffer.get_pixel(x, y)[0] != 0)
    }

    /// Build a mask from an already thresholded gray image (nonzero = foreground)
    pub fn from_gray(image: &GrayImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| image.get_pixel(x, y)[0] != 0)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_foreground(&self, col: u32, row: u32) -> bool {
        self.image.get_pixel(col, row)[0] != 0
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] != 0).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }
}

/// Where inside a pixel a transformed coordinate lands.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PixelAnchor {
    /// Pixel center, `(col + 0.5, row + 0.5)`
    #[default]
    Center,
    /// Pixel upper-left corner, `(col, row)`
    UpperLeft,
}

impl PixelAnchor {
    fn offset(self) -> f64 {
        match self {
            Self::Center => 0.5,
            Self::UpperLeft => 0.0,
        }
    }
}

/// Six-coefficient affine mapping from `(col, row)` to world `(x, y)`:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl GeoTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// From a GeoTIFF `ModelPixelScaleTag` (`[sx, sy, sz]`) and the first
    /// `ModelTiepointTag` entry (`[i, j, k, x, y, z]`). North-up only.
    pub fn from_scale_and_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }
        let (sx, sy) = (scale[0], scale[1]);
        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        Some(Self::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
    }

    /// From a GeoTIFF `ModelTransformationTag` (row-major 4x4 matrix)
    pub fn from_model_transformation(matrix: &[f64]) -> Option<Self> {
        if matrix.len() < 16 {
            return None;
        }
        Some(Self::new(matrix[0], matrix[1], matrix[3], matrix[4], matrix[5], matrix[7]))
    }

    pub fn to_affine(&self) -> AffineTransform<f64> {
        AffineTransform::new(self.a, self.b, self.c, self.d, self.e, self.f)
    }

    /// World coordinates of pixel `(col, row)` at the given anchor
    pub fn xy(&self, col: f64, row: f64, anchor: PixelAnchor) -> [f64; 2] {
        let offset = anchor.offset();
        let world = self.to_affine().apply(Coord { x: col + offset, y: row + offset });
        [world.x, world.y]
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_upper_left_is_exact() {
        let transform = GeoTransform::identity();
        assert_eq!(transform.xy(3.0, 7.0, PixelAnchor::UpperLeft), [3.0, 7.0]);
    }

    #[test]
    fn test_identity_center_offsets_half_pixel() {
        let transform = GeoTransform::identity();
        assert_eq!(transform.xy(3.0, 7.0, PixelAnchor::Center), [3.5, 7.5]);
    }

    #[test]
    fn test_scale_and_tiepoint_north_up() {
        let transform = GeoTransform::from_scale_and_tiepoint(
            &[10.0, 10.0, 0.0],
            &[0.0, 0.0, 0.0, 500_000.0, 4_000_000.0, 0.0],
        )
        .expect("valid tags");

        assert_eq!(transform, GeoTransform::new(10.0, 0.0, 500_000.0, 0.0, -10.0, 4_000_000.0));
        assert_eq!(
            transform.xy(2.0, 1.0, PixelAnchor::UpperLeft),
            [500_020.0, 3_999_990.0]
        );
        assert_eq!(
            transform.xy(2.0, 1.0, PixelAnchor::Center),
            [500_025.0, 3_999_985.0]
        );
    }

    #[test]
    fn test_tiepoint_not_at_origin() {
        let transform = GeoTransform::from_scale_and_tiepoint(
            &[2.0, 2.0, 0.0],
            &[5.0, 5.0, 0.0, 100.0, 200.0, 0.0],
        )
        .expect("valid tags");
        assert_eq!(transform.xy(5.0, 5.0, PixelAnchor::UpperLeft), [100.0, 200.0]);
    }

    #[test]
    fn test_short_tags_are_rejected() {
        assert!(GeoTransform::from_scale_and_tiepoint(&[1.0], &[0.0; 6]).is_none());
        assert!(GeoTransform::from_model_transformation(&[0.0; 12]).is_none());
    }

    #[test]
    fn test_model_transformation_matrix() {
        let matrix = [
            0.5, 0.1, 0.0, 10.0,
            0.2, -0.5, 0.0, 20.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let transform = GeoTransform::from_model_transformation(&matrix).expect("16 values");
        assert_eq!(transform, GeoTransform::new(0.5, 0.1, 10.0, 0.2, -0.5, 20.0));
    }

    #[test]
    fn test_mask_nonzero_is_foreground() {
        let mut buffer = ImageBuffer::<Luma<u16>, Vec<u16>>::new(3, 1);
        buffer.put_pixel(1, 0, Luma([256u16]));
        let mask = Mask::from_luma16(&buffer);

        assert!(!mask.is_foreground(0, 0));
        assert!(mask.is_foreground(1, 0));
        assert_eq!(mask.foreground_count(), 1);
    }

    #[test]
    fn test_anchor_parses_kebab_case() {
        assert_eq!("upper-left".parse::<PixelAnchor>().ok(), Some(PixelAnchor::UpperLeft));
        assert_eq!(PixelAnchor::Center.to_string(), "center");
    }
}
