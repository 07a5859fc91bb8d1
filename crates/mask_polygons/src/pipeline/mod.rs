pub mod builder;

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crate::{
    algorithms::{PixelCoordinates, WorldCoordinates},
    annotation::{AnnotationDocument, Shape},
    error::{MaskError, Result},
    io::{image_file_name, load_geo_mask, load_mask, write_document, OutputPathPolicy},
    traits::{ContourApproximator, ContourExtractor, PointMapper},
    types::{Mask, PixelAnchor},
};

/// Mask-to-annotation conversion: contour extraction, approximation,
/// coordinate mapping and document assembly
pub struct Vectorizer {
    label: String,
    geo: bool,
    anchor: PixelAnchor,
    contour_extractor: Box<dyn ContourExtractor>,
    approximator: Box<dyn ContourApproximator>,
    output_policy: OutputPathPolicy,
    output_path: Option<PathBuf>,
    embed_image_data: bool,
}

impl Vectorizer {
    /// Create a new vectorizer builder for shapes labelled `label`
    pub fn builder(label: impl Into<String>) -> builder::VectorizerBuilder {
        builder::VectorizerBuilder::new(label)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        label: String,
        geo: bool,
        anchor: PixelAnchor,
        contour_extractor: Box<dyn ContourExtractor>,
        approximator: Box<dyn ContourApproximator>,
        output_policy: OutputPathPolicy,
        output_path: Option<PathBuf>,
        embed_image_data: bool,
    ) -> Self {
        Self {
            label,
            geo,
            anchor,
            contour_extractor,
            approximator,
            output_policy,
            output_path,
            embed_image_data,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_geo(&self) -> bool {
        self.geo
    }

    /// One polygon shape per external contour, in discovery order
    pub fn shapes(&self, mask: &Mask, mapper: &dyn PointMapper) -> Result<Vec<Shape>> {
        let contours = self.contour_extractor.extract_contours(mask)?;

        let shapes = contours
            .iter()
            .enumerate()
            .map(|(i, contour)| {
                let approximated = self.approximator.approximate(contour);
                tracing::debug!(
                    "contour {}: {} traced points, {} kept",
                    i, contour.len(), approximated.len()
                );
                let points = approximated
                    .iter()
                    .map(|&[col, row]| mapper.map_point(col, row))
                    .collect();
                Shape::polygon(self.label.clone(), points)
            })
            .collect();

        Ok(shapes)
    }

    /// Assemble the annotation document for `mask`. Dimensions come from the
    /// mask, the image name from `image_path`.
    pub fn build_document(
        &self,
        mask: &Mask,
        mapper: &dyn PointMapper,
        image_path: &Path,
    ) -> Result<AnnotationDocument> {
        let mut document = AnnotationDocument::new(image_file_name(image_path), mask.width(), mask.height());
        for shape in self.shapes(mask, mapper)? {
            document.push_shape(shape);
        }
        if self.embed_image_data {
            document.image_data = STANDARD.encode(std::fs::read(image_path)?);
        }
        Ok(document)
    }

    /// Where the document for `image_path` is written. Fails instead of
    /// returning the image path itself.
    pub fn output_path_for(&self, image_path: &Path) -> Result<PathBuf> {
        match &self.output_path {
            Some(path) if path == image_path => {
                Err(MaskError::InvalidOutputPath(image_path.to_path_buf()))
            }
            Some(path) => Ok(path.clone()),
            None => self.output_policy.derive(image_path),
        }
    }

    /// Read `mask_source`, vectorize it and write the annotation document
    /// next to `image_path`, replacing any previous file. Returns the
    /// written path.
    pub fn vectorize<M, I>(&self, mask_source: M, image_path: I) -> Result<PathBuf>
    where
        M: AsRef<Path>,
        I: AsRef<Path>,
    {
        let mask_source = mask_source.as_ref();
        let image_path = image_path.as_ref();
        let output_path = self.output_path_for(image_path)?;

        let document = if self.geo {
            let raster = load_geo_mask(mask_source)?;
            let mapper = WorldCoordinates::new(raster.transform, self.anchor);
            self.build_document(&raster.mask, &mapper, image_path)?
        } else {
            let mask = load_mask(mask_source)?;
            self.build_document(&mask, &PixelCoordinates, image_path)?
        };

        write_document(&document, &output_path)?;
        tracing::info!(
            "wrote {} shapes for {} to {}",
            document.shapes.len(),
            mask_source.display(),
            output_path.display()
        );
        Ok(output_path)
    }

    /// Get information about the vectorizer configuration
    pub fn info(&self) -> String {
        format!(
            "Vectorizer: label '{}', {} coordinates, {} output path",
            self.label,
            if self.geo { "world" } else { "pixel" },
            match &self.output_path {
                Some(_) => "explicit".to_string(),
                None => self.output_policy.to_string(),
            }
        )
    }
}
