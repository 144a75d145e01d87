//! Geometry catalogue: one boundary per administrative region, read from a
//! GeoJSON FeatureCollection at startup and shared read-only afterwards.

use crate::error::Error;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::{fs, path::Path, sync::Arc};
use verdictmap_core::{db::GeometryRecord, geometry::Boundary};

///
/// GeometryCatalogue
///
/// Regions in file order. File order is the join's output order.
///

#[derive(Clone, Debug, Default)]
pub struct GeometryCatalogue {
    records: Vec<GeometryRecord>,
}

impl GeometryCatalogue {
    #[must_use]
    pub const fn new(records: Vec<GeometryRecord>) -> Self {
        Self { records }
    }

    /// Read a catalogue file and wrap it for sharing.
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Self>, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|err| Error::catalogue(format!("cannot read {}: {err}", path.display())))?;

        Self::from_geojson_str(&json).map(Arc::new)
    }

    pub fn from_geojson_str(json: &str) -> Result<Self, Error> {
        let doc: FeatureCollectionDoc = serde_json::from_str(json)
            .map_err(|err| Error::catalogue(format!("invalid GeoJSON: {err}")))?;

        let records = doc
            .features
            .into_iter()
            .enumerate()
            .map(|(idx, feature)| feature.into_record(idx))
            .collect::<Result<_, _>>()?;

        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, region_name: &str) -> Option<&GeometryRecord> {
        self.records.iter().find(|r| r.region_name == region_name)
    }
}

// ----------------------------------------------------------------------
// GeoJSON document shapes
// ----------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    properties: Option<Map<String, JsonValue>>,
    #[serde(default)]
    geometry: Option<GeometryDoc>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryDoc {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl FeatureDoc {
    fn into_record(self, idx: usize) -> Result<GeometryRecord, Error> {
        let name = self
            .properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(JsonValue::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::catalogue(format!("feature {idx} has no properties.name")))?
            .to_string();

        let geometry = match self.geometry {
            Some(GeometryDoc::Polygon { coordinates }) => polygon(coordinates, idx)?.into(),
            Some(GeometryDoc::MultiPolygon { coordinates }) => MultiPolygon::new(
                coordinates
                    .into_iter()
                    .map(|rings| polygon(rings, idx))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            Some(GeometryDoc::Other) | None => {
                return Err(Error::catalogue(format!(
                    "feature {idx} ('{name}') has no Polygon or MultiPolygon geometry"
                )));
            }
        };

        Ok(GeometryRecord::new(name, Boundary::new(geometry)?))
    }
}

fn polygon(rings: Vec<Vec<Vec<f64>>>, idx: usize) -> Result<Polygon<f64>, Error> {
    let mut rings = rings.into_iter().map(|ring| line_string(ring, idx));
    let exterior = rings
        .next()
        .ok_or_else(|| Error::catalogue(format!("feature {idx} has a polygon with no rings")))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn line_string(ring: Vec<Vec<f64>>, idx: usize) -> Result<LineString<f64>, Error> {
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(Error::catalogue(format!(
                "feature {idx} has a position with fewer than two coordinates"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use verdictmap_core::geometry::GeometryKind;

    const TWO_REGIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "臺北市", "COUNTYSN": "63000" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[121.4, 25.0], [121.6, 25.0], [121.6, 25.2], [121.4, 25.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "澎湖縣" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[119.5, 23.5, 0.0], [119.7, 23.5, 0.0], [119.7, 23.7, 0.0], [119.5, 23.5, 0.0]]],
                        [[[119.4, 23.2], [119.5, 23.2], [119.5, 23.3], [119.4, 23.2]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn features_load_in_file_order() {
        let catalogue = GeometryCatalogue::from_geojson_str(TWO_REGIONS).expect("should parse");

        let names: Vec<&str> = catalogue
            .records()
            .iter()
            .map(|r| r.region_name.as_str())
            .collect();
        assert_eq!(names, vec!["臺北市", "澎湖縣"]);
        assert_eq!(
            catalogue.records()[0].boundary.kind(),
            GeometryKind::Polygon
        );
        assert_eq!(
            catalogue.get("澎湖縣").map(|r| r.boundary.kind()),
            Some(GeometryKind::MultiPolygon)
        );
    }

    #[test]
    fn feature_without_name_is_rejected() {
        let json = r#"{ "features": [ { "properties": {}, "geometry": null } ] }"#;
        let err = GeometryCatalogue::from_geojson_str(json).expect_err("nameless feature");

        assert_eq!(err.kind, ErrorKind::Catalogue);
        assert!(err.message.contains("feature 0"));
    }

    #[test]
    fn point_feature_is_rejected() {
        let json = r#"{ "features": [ {
            "properties": { "name": "X" },
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
        } ] }"#;
        let err = GeometryCatalogue::from_geojson_str(json).expect_err("point is not a region");

        assert!(err.message.contains("'X'"));
    }

    #[test]
    fn short_position_is_rejected() {
        let json = r#"{ "features": [ {
            "properties": { "name": "X" },
            "geometry": { "type": "Polygon", "coordinates": [[[1.0]]] }
        } ] }"#;

        assert!(GeometryCatalogue::from_geojson_str(json).is_err());
    }

    #[test]
    fn missing_file_is_a_catalogue_error() {
        let err = GeometryCatalogue::load("/nonexistent/geo.json").expect_err("no such file");

        assert_eq!(err.kind, ErrorKind::Catalogue);
    }
}
