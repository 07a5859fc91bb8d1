use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::{
    annotation::AnnotationDocument,
    error::{MaskError, Result},
};

const LEGACY_SOURCE_SUFFIX: &str = ".tif";
const ANNOTATION_EXTENSION: &str = "json";

/// How the annotation file path is derived from the reference image path
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputPathPolicy {
    /// `scene.tif` -> `scene.json`, `scene.png` -> `scene.json`
    #[default]
    ReplaceExtension,
    /// Replace the first `.tif` substring anywhere in the path with `.json`.
    /// Matches files produced by older pipelines, quirks included
    /// (`scene.tiff` -> `scene.jsonf`).
    LegacyTifSubstring,
}

impl OutputPathPolicy {
    /// Derive the annotation path for `image_path`. Fails rather than
    /// returning the image path itself.
    pub fn derive(self, image_path: &Path) -> Result<PathBuf> {
        let derived = match self {
            Self::ReplaceExtension => image_path.with_extension(ANNOTATION_EXTENSION),
            Self::LegacyTifSubstring => {
                let raw = image_path.to_string_lossy();
                PathBuf::from(raw.replacen(LEGACY_SOURCE_SUFFIX, ".json", 1))
            }
        };

        if derived == image_path {
            return Err(MaskError::InvalidOutputPath(image_path.to_path_buf()));
        }
        Ok(derived)
    }
}

/// File name component of the reference image, as embedded in `imagePath`
pub fn image_file_name(image_path: &Path) -> String {
    image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write the document to `path`, replacing any existing file
pub fn write_document<P: AsRef<Path>>(document: &AnnotationDocument, path: P) -> Result<()> {
    let json = document.to_json_string()?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a complete annotation document
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<AnnotationDocument> {
    let json = std::fs::read_to_string(path)?;
    AnnotationDocument::from_json_str(&json)
}
