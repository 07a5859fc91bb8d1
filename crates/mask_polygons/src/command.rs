use std::path::PathBuf;

use serde::{Serialize, Deserialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::{
    algorithms::ContourApproximation,
    error::Result,
    io::OutputPathPolicy,
    pipeline::Vectorizer,
    table::{self, GeometryTable},
    types::PixelAnchor,
};

/// Parameters of a single mask vectorization
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VectorizeParams {
    #[schemars(description = "Mask raster or image; nonzero pixels are foreground")]
    pub mask_path: PathBuf,
    #[schemars(description = "Reference image; only its name and path are used")]
    pub image_path: PathBuf,
    #[schemars(description = "Label applied to every extracted shape", length(min = 1))]
    pub label: String,
    #[schemars(description = "Write world coordinates from the raster's affine transform")]
    #[serde(default)]
    pub geo: bool,
    #[serde(default)]
    pub anchor: PixelAnchor,
    #[serde(default)]
    pub approximation: ContourApproximation,
    #[serde(default)]
    pub output_policy: OutputPathPolicy,
    #[schemars(description = "Explicit output path; overrides output_policy")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[schemars(description = "Embed the base64-encoded reference image in imageData")]
    #[serde(default)]
    pub embed_image_data: bool,
}

impl VectorizeParams {
    pub fn vectorizer(&self) -> Vectorizer {
        let builder = Vectorizer::builder(self.label.clone())
            .geo(self.geo)
            .anchor(self.anchor)
            .approximation(self.approximation)
            .output_policy(self.output_policy)
            .embed_image_data(self.embed_image_data);

        let builder = match &self.output_path {
            Some(path) => builder.output_path(path.clone()),
            None => builder,
        };
        builder.build()
    }
}

/// Parameters of a single annotation load
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LoadParams {
    #[schemars(description = "Annotation document to load")]
    pub json_path: PathBuf,
    #[schemars(description = "Optional GeoJSON export of the loaded rows")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geojson_output: Option<PathBuf>,
}

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum ConversionCommand {
    /// Convert a mask into an annotation document
    #[serde(rename = "vectorize")]
    Vectorize(VectorizeParams),

    /// Load an annotation document into a geometry table
    #[serde(rename = "load")]
    Load(LoadParams),
}

/// Result of executing a [`ConversionCommand`]
#[derive(Debug)]
pub enum CommandOutcome {
    /// Path of the written annotation document
    Written(PathBuf),
    /// Rows loaded from an annotation document
    Loaded(GeometryTable),
}

impl ConversionCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ConversionCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Vectorize(_) => "Extract external mask contours as labelled polygons and write an annotation document",
            Self::Load(_) => "Load polygons with at least four points from an annotation document",
        }
    }

    pub fn execute(&self) -> Result<CommandOutcome> {
        match self {
            Self::Vectorize(params) => {
                let path = params.vectorizer().vectorize(&params.mask_path, &params.image_path)?;
                Ok(CommandOutcome::Written(path))
            }
            Self::Load(params) => {
                let table = table::load(&params.json_path)?;
                if let Some(output) = &params.geojson_output {
                    table.save_geojson(output)?;
                    tracing::info!("exported {} rows to {}", table.len(), output.display());
                }
                Ok(CommandOutcome::Loaded(table))
            }
        }
    }
}
