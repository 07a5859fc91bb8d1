use std::path::PathBuf;

use crate::{
    algorithms::{ContourApproximation, ExternalContourExtractor},
    io::OutputPathPolicy,
    pipeline::Vectorizer,
    traits::{ContourApproximator, ContourExtractor},
    types::PixelAnchor,
};

/// Builder for configuring a [`Vectorizer`] with a fluent API
pub struct VectorizerBuilder {
    label: String,
    geo: bool,
    anchor: PixelAnchor,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    approximator: Option<Box<dyn ContourApproximator>>,
    output_policy: OutputPathPolicy,
    output_path: Option<PathBuf>,
    embed_image_data: bool,
}

impl VectorizerBuilder {
    /// Create a new builder; every shape gets `label`
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            geo: false,
            anchor: PixelAnchor::default(),
            contour_extractor: None,
            approximator: None,
            output_policy: OutputPathPolicy::default(),
            output_path: None,
            embed_image_data: false,
        }
    }

    /// World coordinates from the raster's transform instead of pixel indices
    pub fn geo(mut self, geo: bool) -> Self {
        self.geo = geo;
        self
    }

    /// Pixel anchor used in geo mode
    pub fn anchor(mut self, anchor: PixelAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the contour extractor (replaces the default external extractor)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set a custom contour approximator
    pub fn set_approximator<A>(mut self, approximator: A) -> Self
    where
        A: ContourApproximator + 'static,
    {
        self.approximator = Some(Box::new(approximator));
        self
    }

    pub fn approximation(self, approximation: ContourApproximation) -> Self {
        self.set_approximator(approximation)
    }

    pub fn output_policy(mut self, policy: OutputPathPolicy) -> Self {
        self.output_policy = policy;
        self
    }

    /// Write to this path instead of deriving one from the image path
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Store the base64-encoded reference image in `imageData`
    pub fn embed_image_data(mut self, embed: bool) -> Self {
        self.embed_image_data = embed;
        self
    }

    /// Build the vectorizer with default components if not specified
    pub fn build(self) -> Vectorizer {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        let approximator = self.approximator
            .unwrap_or_else(|| Box::new(ContourApproximation::default()));

        Vectorizer::new(
            self.label,
            self.geo,
            self.anchor,
            contour_extractor,
            approximator,
            self.output_policy,
            self.output_path,
            self.embed_image_data,
        )
    }
}
