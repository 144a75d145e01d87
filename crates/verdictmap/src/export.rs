//! Rendering collaborator boundary.
//!
//! The joined table is handed over exactly as the join produced it.
//! [`GeoJsonExporter`] is the handoff used by the shell: it writes a
//! FeatureCollection any choropleth/tile renderer can consume.

use crate::error::Error;
use geo_types::{Geometry, LineString, Polygon};
use serde_json::{Value as JsonValue, json};
use std::{fs, path::PathBuf};
use verdictmap_core::db::JoinedRecord;

///
/// ChoroplethRenderer
///

pub trait ChoroplethRenderer {
    type Output;

    fn render(&self, records: &[JoinedRecord]) -> Result<Self::Output, Error>;
}

///
/// GeoJsonExporter
///
/// Renders the joined table as GeoJSON; optionally writes it to `path`.
/// Property names match the aggregate table's columns.
///

#[derive(Clone, Debug, Default)]
pub struct GeoJsonExporter {
    path: Option<PathBuf>,
}

impl GeoJsonExporter {
    #[must_use]
    pub const fn in_memory() -> Self {
        Self { path: None }
    }

    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn feature_collection(records: &[JoinedRecord]) -> JsonValue {
        let features: Vec<JsonValue> = records.iter().map(feature).collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl ChoroplethRenderer for GeoJsonExporter {
    type Output = JsonValue;

    fn render(&self, records: &[JoinedRecord]) -> Result<JsonValue, Error> {
        let doc = Self::feature_collection(records);

        if let Some(path) = &self.path {
            let text = serde_json::to_string(&doc)?;
            fs::write(path, text)
                .map_err(|err| Error::export(format!("cannot write {}: {err}", path.display())))?;
        }

        Ok(doc)
    }
}

fn feature(record: &JoinedRecord) -> JsonValue {
    let mut value = json!({
        "type": "Feature",
        "properties": {
            "name": record.region_name,
            "City/County": record.region_name,
            "Count": record.count,
            "CountySN": record.region_code,
        },
        "geometry": geometry(record.boundary.geometry()),
    });

    if let Some(bbox) = record.boundary.bbox() {
        value["bbox"] = json!(bbox.to_array());
    }

    value
}

fn geometry(geometry: &Geometry<f64>) -> JsonValue {
    match geometry {
        Geometry::Polygon(p) => json!({
            "type": "Polygon",
            "coordinates": polygon_rings(p),
        }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
        // Boundary only admits polygonal shapes.
        _ => JsonValue::Null,
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring)
        .collect()
}

fn ring(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdictmap_core::geometry::Boundary;

    fn record(name: &str, count: Option<u64>) -> JoinedRecord {
        JoinedRecord {
            region_name: name.to_string(),
            boundary: Boundary::from_wkt("POLYGON((0 0, 2 0, 2 1, 0 0))").expect("polygon"),
            count,
            region_code: count.map(|_| "63000".to_string()),
        }
    }

    #[test]
    fn absent_count_exports_as_null() {
        let doc = GeoJsonExporter::in_memory()
            .render(&[record("A", Some(5)), record("B", None)])
            .expect("render should succeed");

        let features = doc["features"].as_array().expect("features array");
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["Count"], json!(5));
        assert_eq!(features[0]["properties"]["CountySN"], json!("63000"));
        assert_eq!(features[1]["properties"]["Count"], JsonValue::Null);
        assert_eq!(features[1]["properties"]["City/County"], json!("B"));
    }

    #[test]
    fn polygon_coordinates_and_bbox_are_written() {
        let doc = GeoJsonExporter::feature_collection(&[record("A", Some(1))]);
        let feature = &doc["features"][0];

        assert_eq!(feature["geometry"]["type"], json!("Polygon"));
        assert_eq!(feature["geometry"]["coordinates"][0][1], json!([2.0, 0.0]));
        assert_eq!(feature["bbox"], json!([0.0, 0.0, 2.0, 1.0]));
    }

    #[test]
    fn unwritable_path_is_an_export_error() {
        let err = GeoJsonExporter::to_file("/nonexistent/dir/map.geojson")
            .render(&[record("A", None)])
            .expect_err("directory does not exist");

        assert_eq!(err.kind, crate::error::ErrorKind::Export);
    }
}
