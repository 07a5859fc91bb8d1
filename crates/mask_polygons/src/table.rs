//! Geometry table built from annotation documents.

use std::path::Path;

use geo::Area;
use geo_types::{Coord, LineString, Polygon};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    annotation::AnnotationDocument,
    error::{MaskError, Result},
};

/// Fewest points a shape needs to become a table row
pub const MIN_POLYGON_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRow {
    pub geometry: Polygon<f64>,
    pub label: String,
}

impl GeometryRow {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Row-per-shape table of `(geometry, label)`, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryTable {
    rows: Vec<GeometryRow>,
}

/// Only the fields the loader needs, so documents from other tools that omit
/// the styling keys still load
#[derive(Debug, Deserialize)]
struct ShapeRecord {
    label: String,
    points: Vec<[f64; 2]>,
}

impl GeometryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row if `points` has at least [`MIN_POLYGON_POINTS`] entries.
    /// Returns whether the row was added.
    pub fn push_shape(&mut self, label: impl Into<String>, points: &[[f64; 2]]) -> bool {
        if points.len() < MIN_POLYGON_POINTS {
            return false;
        }
        let exterior: LineString<f64> = points
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect::<Vec<_>>()
            .into();
        self.rows.push(GeometryRow {
            geometry: Polygon::new(exterior, vec![]),
            label: label.into(),
        });
        true
    }

    /// Build a table from an in-memory document
    pub fn from_document(document: &AnnotationDocument) -> Self {
        let mut table = Self::new();
        for shape in &document.shapes {
            table.push_shape(shape.label.clone(), &shape.coordinates());
        }
        table
    }

    /// Build a table from annotation JSON text. Only the `shapes` key is
    /// required.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        let shapes = value
            .get_mut("shapes")
            .map(Value::take)
            .ok_or(MaskError::MissingKey("shapes"))?;
        let shapes: Vec<Value> = serde_json::from_value(shapes)?;

        let mut table = Self::new();
        for (index, shape) in shapes.into_iter().enumerate() {
            // Short shapes are skipped before their fields are validated
            let count = shape.get("points").and_then(Value::as_array).map_or(0, Vec::len);
            if count < MIN_POLYGON_POINTS {
                tracing::debug!(
                    "skipping shape {} with {} points (need {})",
                    index, count, MIN_POLYGON_POINTS
                );
                continue;
            }
            let record: ShapeRecord = serde_json::from_value(shape)?;
            table.push_shape(record.label, &record.points);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[GeometryRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeometryRow> {
        self.rows.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn geometries(&self) -> Vec<&Polygon<f64>> {
        self.rows.iter().map(|row| &row.geometry).collect()
    }

    pub fn into_rows(self) -> Vec<GeometryRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a GeometryTable {
    type Item = &'a GeometryRow;
    type IntoIter = std::slice::Iter<'a, GeometryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Load an annotation JSON file into a geometry table. Shapes with fewer than
/// four points are dropped.
pub fn load<P: AsRef<Path>>(json_path: P) -> Result<GeometryTable> {
    let json_path = json_path.as_ref();
    let json = std::fs::read_to_string(json_path)?;
    let table = GeometryTable::from_json_str(&json)?;
    tracing::info!("loaded {} polygons from {}", table.len(), json_path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(offset: f64) -> Value {
        json!([[offset, offset], [offset + 2.0, offset], [offset + 2.0, offset + 2.0], [offset, offset + 2.0]])
    }

    #[test]
    fn test_three_points_skipped_four_kept() {
        let document = json!({
            "shapes": [
                { "label": "triangle", "points": [[0, 0], [4, 0], [0, 4]] },
                { "label": "quad", "points": [[0, 0], [4, 0], [4, 4], [0, 4]] },
            ]
        });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.labels(), vec!["quad"]);
        assert_eq!(table.rows()[0].area(), 16.0);
    }

    #[test]
    fn test_row_order_follows_shapes() {
        let document = json!({
            "shapes": [
                { "label": "a", "points": square(0.0) },
                { "label": "dot", "points": [[1, 1]] },
                { "label": "b", "points": square(10.0) },
                { "label": "c", "points": square(20.0) },
            ]
        });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();
        assert_eq!(table.labels(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let document = json!({ "shapes": [{ "label": "a", "points": square(0.0) }] });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();
        let ring = table.geometries()[0].exterior();

        assert_eq!(ring.0.len(), 5);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn test_self_intersecting_polygon_passes_through() {
        let bowtie = json!([[0, 0], [2, 2], [2, 0], [0, 2]]);
        let document = json!({ "shapes": [{ "label": "bowtie", "points": bowtie }] });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_flat_point_list_is_skipped() {
        let document = json!({
            "shapes": [
                { "label": "dot", "points": [40, 40] },
                { "label": "quad", "points": square(0.0) },
            ]
        });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();
        assert_eq!(table.labels(), vec!["quad"]);
    }

    #[test]
    fn test_short_shape_without_label_is_skipped() {
        let document = json!({
            "shapes": [
                { "points": [[1, 1]] },
                { "label": "quad", "points": square(5.0) },
            ]
        });
        let table = GeometryTable::from_json_str(&document.to_string()).unwrap();
        assert_eq!(table.labels(), vec!["quad"]);
    }

    #[test]
    fn test_kept_shape_without_label_fails() {
        let document = json!({ "shapes": [{ "points": square(0.0) }] });
        assert!(matches!(
            GeometryTable::from_json_str(&document.to_string()),
            Err(MaskError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_shapes_key() {
        let result = GeometryTable::from_json_str(r#"{"version": "3.21.1"}"#);
        assert!(matches!(result, Err(MaskError::MissingKey("shapes"))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            GeometryTable::from_json_str("{ not json"),
            Err(MaskError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path().join("absent.json")), Err(MaskError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let document = json!({ "shapes": [{ "label": "field", "points": square(3.0) }] });
        std::fs::write(&path, document.to_string()).unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].label, "field");
    }
}
