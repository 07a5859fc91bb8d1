use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::Geometry;
use ts_rs::TS;
use schemars::JsonSchema;

/// Properties attached to each exported geometry row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Properties for exported annotation polygons")]
pub struct PolygonProperties {
    #[schemars(description = "Annotation label of the shape")]
    pub label: String,
    #[schemars(description = "Planar area in the document's coordinate units")]
    pub area: f64,
    #[schemars(description = "Number of points in the source shape, closing point excluded")]
    pub point_count: usize,
}

/// A GeoJSON Feature whose properties deserialize into `P`.
#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }

    pub fn into_feature(self) -> geojson::Feature {
        self.feature
    }
}

impl<P> From<geojson::Feature> for TypedFeature<P> {
    fn from(feature: geojson::Feature) -> Self {
        Self {
            feature,
            _properties: PhantomData,
        }
    }
}
