use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use crate::{
    error::Result,
    table::GeometryTable,
    typed_geojson::{PolygonProperties, TypedFeature},
};

impl GeometryTable {
    /// Export rows as a GeoJSON FeatureCollection, one feature per row
    pub fn to_geojson(&self) -> FeatureCollection {
        let features: Vec<Feature> = self
            .iter()
            .map(|row| {
                let geometry = Geometry::new(Value::from(&row.geometry));
                let properties = PolygonProperties {
                    label: row.label.clone(),
                    area: row.area(),
                    point_count: row.geometry.exterior().0.len().saturating_sub(1),
                };
                TypedFeature::new(Some(geometry), properties).into_feature()
            })
            .collect();

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("row_count".to_string(), serde_json::Value::from(self.len()));

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}
