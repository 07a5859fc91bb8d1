//! LabelMe-compatible annotation document.
//!
//! Field names and key order follow the labeling tool's on-disk format, so
//! the camelCase document keys are renamed explicitly.

use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};
use ts_rs::TS;

use crate::error::Result;

/// Schema version written to every document
pub const SCHEMA_VERSION: &str = "3.21.1";
/// Document-level default line colour (RGBA)
pub const LINE_COLOR: [u8; 4] = [0, 255, 0, 128];
/// Document-level default fill colour (RGBA)
pub const FILL_COLOR: [u8; 4] = [255, 0, 0, 128];
pub const POLYGON_SHAPE_TYPE: &str = "polygon";

const INDENT: &[u8] = b"    ";

/// One coordinate of a shape point. Pixel coordinates are written as JSON
/// integers, world coordinates as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
pub enum Ordinate {
    Pixel(i64),
    World(f64),
}

impl Ordinate {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Pixel(v) => v as f64,
            Self::World(v) => v,
        }
    }
}

impl From<u32> for Ordinate {
    fn from(value: u32) -> Self {
        Self::Pixel(i64::from(value))
    }
}

impl From<f64> for Ordinate {
    fn from(value: f64) -> Self {
        Self::World(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Shape {
    pub label: String,
    pub line_color: Option<[u8; 4]>,
    pub fill_color: Option<[u8; 4]>,
    pub points: Vec<[Ordinate; 2]>,
    pub shape_type: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub flags: Map<String, Value>,
}

impl Shape {
    /// Polygon shape with the tool's default (unset) colours
    pub fn polygon(label: impl Into<String>, points: Vec<[Ordinate; 2]>) -> Self {
        Self {
            label: label.into(),
            line_color: None,
            fill_color: None,
            points,
            shape_type: POLYGON_SHAPE_TYPE.to_string(),
            flags: Map::new(),
        }
    }

    /// Points as `[x, y]` floats
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|[x, y]| [x.as_f64(), y.as_f64()])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnnotationDocument {
    pub version: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub flags: Map<String, Value>,
    pub shapes: Vec<Shape>,
    #[serde(rename = "lineColor")]
    pub line_color: [u8; 4],
    #[serde(rename = "fillColor")]
    pub fill_color: [u8; 4],
    #[serde(rename = "imagePath")]
    pub image_path: String,
    #[serde(rename = "imageData", default)]
    pub image_data: String,
    #[serde(rename = "imageHeight")]
    pub image_height: u32,
    #[serde(rename = "imageWidth")]
    pub image_width: u32,
}

impl AnnotationDocument {
    /// Empty document for an image of the given size
    pub fn new(image_path: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            flags: Map::new(),
            shapes: Vec::new(),
            line_color: LINE_COLOR,
            fill_color: FILL_COLOR,
            image_path: image_path.into(),
            image_data: String::new(),
            image_height,
            image_width,
        }
    }

    pub fn push_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Serialize with 4-space indentation
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
        self.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
