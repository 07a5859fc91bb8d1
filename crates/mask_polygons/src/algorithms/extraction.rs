use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType};
use crate::{
    error::Result,
    traits::ContourExtractor,
    types::{Contour, Mask},
};

/// Imageproc border-following extractor that keeps only top-level outer
/// borders. Hole borders and regions nested inside holes are dropped.
///
/// The mask is traced inside a one-pixel background frame so regions touching
/// the image edge still get an outer border.
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_contours(&self, mask: &Mask) -> Result<Vec<Contour>> {
        let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
        imageops::replace(&mut framed, mask.as_image(), 1, 1);
        let contours = find_contours::<u32>(&framed);

        let result: Vec<Contour> = contours
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                contour.points
                    .iter()
                    .map(|p| [p.x - 1, p.y - 1])
                    .collect()
            })
            .collect();

        tracing::debug!("extracted {} external contours", result.len());
        Ok(result)
    }
}
