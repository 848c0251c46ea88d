//! Decode governorate boundaries from a GeoJSON `FeatureCollection`.
//!
//! Only `Polygon` and `MultiPolygon` geometries are drawn. Features with
//! other geometry types, or with no geometry at all, are skipped with a
//! warning. Positions are `[longitude, latitude]` and map onto
//! [`geo::Coord`] as `x` and `y`.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::warn;
use navigator_core::{BoundaryFeature, BoundarySet};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Reasons a GeoJSON document cannot be turned into boundaries.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    /// The document is not valid JSON or lacks the expected members.
    #[error("invalid GeoJSON document: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level object is not a `FeatureCollection`.
    #[error("expected a FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// The `type` that was found.
        found: String,
    },
    /// A polygon's coordinates are not nested position arrays.
    #[error("feature {index} has invalid {geometry} coordinates: {message}")]
    Coordinates {
        /// Zero-based feature position.
        index: usize,
        /// Geometry type being decoded.
        geometry: String,
        /// What was wrong.
        message: String,
    },
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Rings = Vec<Vec<Vec<f64>>>;

/// Decode a boundary file.
///
/// # Errors
///
/// Returns [`GeoJsonError`] when the bytes are not a `FeatureCollection` or a
/// polygon's coordinates are malformed.
///
/// # Examples
///
/// ```
/// use navigator_core::GovernorateId;
/// use navigator_data::decode_boundaries;
///
/// let doc = br#"{
///   "type": "FeatureCollection",
///   "features": [{
///     "type": "Feature",
///     "properties": { "id": 2, "name": "Sousse" },
///     "geometry": { "type": "Polygon",
///                   "coordinates": [[[10.4, 35.6], [10.9, 35.6], [10.9, 36.1], [10.4, 35.6]]] }
///   }]
/// }"#;
/// let set = decode_boundaries(doc)?;
/// assert_eq!(set.len(), 1);
/// assert!(set.feature_for(GovernorateId::new(2)).is_some());
/// # Ok::<(), navigator_data::GeoJsonError>(())
/// ```
pub fn decode_boundaries(bytes: &[u8]) -> Result<BoundarySet, GeoJsonError> {
    let collection: RawCollection = serde_json::from_slice(bytes)?;
    if collection.kind != "FeatureCollection" {
        return Err(GeoJsonError::NotFeatureCollection {
            found: collection.kind,
        });
    }

    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            warn!("Skipping boundary feature {index}: no geometry");
            continue;
        };
        let Some(shape) = decode_geometry(index, geometry)? else {
            continue;
        };
        let properties = feature.properties.unwrap_or_default();
        features.push(BoundaryFeature::from_properties(&properties, shape));
    }
    Ok(BoundarySet::new(features))
}

fn decode_geometry(
    index: usize,
    geometry: RawGeometry,
) -> Result<Option<MultiPolygon<f64>>, GeoJsonError> {
    let invalid = |message: String| GeoJsonError::Coordinates {
        index,
        geometry: geometry.kind.clone(),
        message,
    };
    match geometry.kind.as_str() {
        "Polygon" => {
            let rings: Rings = serde_json::from_value(geometry.coordinates.clone())
                .map_err(|err| invalid(err.to_string()))?;
            let polygon = polygon(rings).map_err(invalid)?;
            Ok(Some(MultiPolygon::new(vec![polygon])))
        }
        "MultiPolygon" => {
            let parts: Vec<Rings> = serde_json::from_value(geometry.coordinates.clone())
                .map_err(|err| invalid(err.to_string()))?;
            let polygons = parts
                .into_iter()
                .map(polygon)
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            Ok(Some(MultiPolygon::new(polygons)))
        }
        other => {
            warn!("Skipping boundary feature {index}: unsupported geometry type {other}");
            Ok(None)
        }
    }
}

fn polygon(rings: Rings) -> Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(ring);
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon has no exterior ring".to_owned())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring(positions: Vec<Vec<f64>>) -> Result<LineString<f64>, String> {
    positions
        .into_iter()
        .map(|position| match (position.first(), position.get(1)) {
            (Some(&x), Some(&y)) => Ok(Coord { x, y }),
            _ => Err(format!("position {position:?} has fewer than two values")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
