//! Region boundary descriptors.
//!
//! A [`Boundary`] is opaque to the join: it is carried from the geometry
//! catalogue to the renderer untouched. Only polygonal shapes describe an
//! administrative region, so construction rejects everything else.

use derive_more::Display;
use geo::BoundingRect;
use geo_types::Geometry;
use std::{str::FromStr, sync::Arc};
use thiserror::Error as ThisError;

///
/// GeometryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum GeometryError {
    #[error("WKT parse error: {0}")]
    WktParse(String),

    #[error("unsupported boundary geometry: {kind}")]
    Unsupported { kind: &'static str },
}

///
/// GeometryKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

///
/// BBox
/// Axis-aligned bounding box in catalogue coordinates (lng/lat).
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BBox {
    /// GeoJSON member order: `[west, south, east, north]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

///
/// Boundary
///
/// Shared, immutable region outline. Clones share the same geometry.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Boundary(Arc<Geometry<f64>>);

impl Boundary {
    pub fn new(geometry: Geometry<f64>) -> Result<Self, GeometryError> {
        match geometry {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok(Self(Arc::new(geometry))),
            other => Err(GeometryError::Unsupported {
                kind: geometry_label(&other),
            }),
        }
    }

    pub fn from_wkt(wkt: &str) -> Result<Self, GeometryError> {
        let parsed = wkt::Wkt::<f64>::from_str(wkt)
            .map_err(|e| GeometryError::WktParse(e.to_string()))?;
        let geometry: Geometry<f64> = parsed
            .try_into()
            .map_err(|e: wkt::conversion::Error| GeometryError::WktParse(format!("{e:?}")))?;

        Self::new(geometry)
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.0
    }

    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match &*self.0 {
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            _ => GeometryKind::Polygon,
        }
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        let rect = self.0.bounding_rect()?;

        Some(BBox {
            min_lng: rect.min().x,
            min_lat: rect.min().y,
            max_lng: rect.max().x,
            max_lat: rect.max().y,
        })
    }
}

const fn geometry_label(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Point, polygon};

    #[test]
    fn polygon_wkt_builds_boundary_with_bbox() {
        let boundary = Boundary::from_wkt("POLYGON((121 25, 122 25, 122 26, 121 26, 121 25))")
            .expect("polygon should parse");

        assert_eq!(boundary.kind(), GeometryKind::Polygon);
        assert_eq!(
            boundary.bbox().map(BBox::to_array),
            Some([121.0, 25.0, 122.0, 26.0])
        );
    }

    #[test]
    fn multipolygon_is_accepted() {
        let boundary = Boundary::from_wkt(
            "MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6, 5 5)))",
        )
        .expect("multipolygon should parse");

        assert_eq!(boundary.kind(), GeometryKind::MultiPolygon);
    }

    #[test]
    fn non_polygonal_geometry_is_rejected() {
        let err = Boundary::new(Point::new(1.0, 2.0).into()).expect_err("point is not a region");

        assert_eq!(err, GeometryError::Unsupported { kind: "Point" });
    }

    #[test]
    fn garbage_wkt_is_a_parse_error() {
        assert!(matches!(
            Boundary::from_wkt("POLYGON((nope"),
            Err(GeometryError::WktParse(_))
        ));
    }

    #[test]
    fn clones_share_geometry() {
        let triangle = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0)];
        let boundary = Boundary::new(triangle.into()).expect("polygon should build");
        let clone = boundary.clone();

        assert!(Arc::ptr_eq(&boundary.0, &clone.0));
        assert_eq!(boundary, clone);
    }
}
