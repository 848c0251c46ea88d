//! Governorates: Tunisia's first-level administrative regions.
//!
//! Governorate ids are the join key across every dataset. Source files
//! disagree on whether ids are integers or numeric strings, so
//! [`GovernorateId`] normalises both forms when deserialising and the rest of
//! the crate only ever compares `u32` values.

use std::collections::HashMap;
use std::fmt;

use geo::Coord;
use log::warn;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Canonical governorate identifier.
///
/// # Examples
///
/// ```
/// use navigator_core::GovernorateId;
/// use serde_json::json;
///
/// assert_eq!(GovernorateId::from_json(&json!(12)), Some(GovernorateId::new(12)));
/// assert_eq!(GovernorateId::from_json(&json!(" 12 ")), Some(GovernorateId::new(12)));
/// assert_eq!(GovernorateId::from_json(&json!("Tunis")), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GovernorateId(u32);

impl GovernorateId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Normalise a JSON integer or numeric string into an identifier.
    ///
    /// Returns `None` for negative, fractional, oversized or non-numeric
    /// values.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .map(Self),
            Value::String(text) => text.trim().parse::<u32>().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for GovernorateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GovernorateId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for GovernorateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid governorate id {value}")))
    }
}

/// Reference data describing a single governorate.
///
/// Only `id` and `name` are required; every other attribute defaults when
/// absent from the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Governorate {
    /// Join key shared with sector and score datasets.
    pub id: GovernorateId,
    /// English name.
    pub name: String,
    /// Arabic name.
    #[serde(default)]
    pub name_ar: String,
    /// Broad region (north, centre, south, ...).
    #[serde(default)]
    pub region: String,
    /// Resident population.
    #[serde(default)]
    pub population: u64,
    /// Surface area in square kilometres.
    #[serde(default)]
    pub area_km2: f64,
    /// Administrative capital.
    #[serde(default)]
    pub capital: String,
    /// Whether the governorate borders the sea.
    #[serde(default, rename = "coastalAccess")]
    pub coastal_access: bool,
    /// Unemployment rate in percent.
    #[serde(default)]
    pub unemployment_rate: f64,
    /// Youth unemployment rate in percent.
    #[serde(default)]
    pub youth_unemployment: f64,
    /// Inhabitants per square kilometre.
    #[serde(default)]
    pub population_density: f64,
    /// Share of the population living in urban areas, in percent.
    #[serde(default)]
    pub urban_percentage: f64,
    /// Marker position with `x = longitude` and `y = latitude`.
    ///
    /// Source files store `[lat, lng]`; malformed pairs load as `None`.
    #[serde(
        default,
        rename = "coordinates",
        deserialize_with = "coordinates::deserialize",
        serialize_with = "coordinates::serialize"
    )]
    pub location: Option<Coord<f64>>,
}

impl Governorate {
    /// Construct a governorate with default attributes and no coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use navigator_core::{Governorate, GovernorateId};
    ///
    /// let tunis = Governorate::new(GovernorateId::new(1), "Tunis").with_coordinates(36.8, 10.18);
    /// assert_eq!(tunis.location.map(|c| c.y), Some(36.8));
    /// ```
    #[must_use]
    pub fn new(id: GovernorateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            name_ar: String::new(),
            region: String::new(),
            population: 0,
            area_km2: 0.0,
            capital: String::new(),
            coastal_access: false,
            unemployment_rate: 0.0,
            youth_unemployment: 0.0,
            population_density: 0.0,
            urban_percentage: 0.0,
            location: None,
        }
    }

    /// Attach a latitude/longitude pair.
    #[must_use]
    pub const fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(Coord {
            x: longitude,
            y: latitude,
        });
        self
    }
}

mod coordinates {
    use geo::Coord;
    use serde::ser::SerializeTuple;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Coord<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(parse_pair))
    }

    fn parse_pair(value: &Value) -> Option<Coord<f64>> {
        let [lat, lng] = value.as_array()?.as_slice() else {
            return None;
        };
        let latitude = lat.as_f64().filter(|v| v.is_finite())?;
        let longitude = lng.as_f64().filter(|v| v.is_finite())?;
        Some(Coord {
            x: longitude,
            y: latitude,
        })
    }

    pub(super) fn serialize<S>(value: &Option<Coord<f64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(coord) => {
                let mut pair = serializer.serialize_tuple(2)?;
                pair.serialize_element(&coord.y)?;
                pair.serialize_element(&coord.x)?;
                pair.end()
            }
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
struct GovernoratesFile {
    #[serde(default)]
    governorates: Vec<Governorate>,
}

/// The governorates dataset in source order, indexed by id.
///
/// Deserialises from `{ "governorates": [...] }`. When an id appears twice
/// the first entry is kept and later ones are dropped with a warning, so an
/// id names exactly one governorate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "GovernoratesFile")]
pub struct GovernorateSet {
    governorates: Vec<Governorate>,
    index: HashMap<GovernorateId, usize>,
}

impl GovernorateSet {
    /// Build a set from governorates in source order.
    #[must_use]
    pub fn new(source: Vec<Governorate>) -> Self {
        let mut index = HashMap::with_capacity(source.len());
        let mut governorates = Vec::with_capacity(source.len());
        for governorate in source {
            if index.contains_key(&governorate.id) {
                warn!(
                    "Duplicate governorate id {} ({}); keeping the first entry",
                    governorate.id, governorate.name
                );
                continue;
            }
            index.insert(governorate.id, governorates.len());
            governorates.push(governorate);
        }
        Self {
            governorates,
            index,
        }
    }

    /// Look up a governorate by id.
    #[must_use]
    pub fn get(&self, id: GovernorateId) -> Option<&Governorate> {
        self.index
            .get(&id)
            .and_then(|&position| self.governorates.get(position))
    }

    /// All governorates in source order.
    #[must_use]
    pub fn as_slice(&self) -> &[Governorate] {
        &self.governorates
    }

    /// Iterate in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Governorate> {
        self.governorates.iter()
    }

    /// Number of governorates loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.governorates.len()
    }

    /// Report whether the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.governorates.is_empty()
    }
}

impl From<GovernoratesFile> for GovernorateSet {
    fn from(file: GovernoratesFile) -> Self {
        Self::new(file.governorates)
    }
}

impl<'a> IntoIterator for &'a GovernorateSet {
    type Item = &'a Governorate;
    type IntoIter = std::slice::Iter<'a, Governorate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(7), Some(7))]
    #[case(json!("7"), Some(7))]
    #[case(json!(" 24 "), Some(24))]
    #[case(json!(-1), None)]
    #[case(json!(1.5), None)]
    #[case(json!("north"), None)]
    #[case(json!(null), None)]
    #[case(json!(u64::from(u32::MAX) + 1), None)]
    fn id_normalisation(#[case] value: Value, #[case] expected: Option<u32>) {
        assert_eq!(
            GovernorateId::from_json(&value),
            expected.map(GovernorateId::new)
        );
    }

    #[rstest]
    fn deserialises_string_and_integer_ids() {
        let set: GovernorateSet = serde_json::from_value(json!({
            "governorates": [
                { "id": 1, "name": "Tunis", "coastalAccess": true },
                { "id": "2", "name": "Ariana" }
            ]
        }))
        .expect("governorates should parse");

        assert_eq!(set.len(), 2);
        let ariana = set.get(GovernorateId::new(2)).expect("Ariana present");
        assert_eq!(ariana.name, "Ariana");
        assert!(!ariana.coastal_access);
        assert!(set.get(GovernorateId::new(1)).is_some_and(|g| g.coastal_access));
    }

    #[rstest]
    #[case(json!([36.8, 10.18]), Some((10.18, 36.8)))]
    #[case(json!([36.8]), None)]
    #[case(json!([36.8, 10.18, 4.0]), None)]
    #[case(json!(["36.8", "10.18"]), None)]
    #[case(json!(null), None)]
    fn coordinates_are_lenient(#[case] coordinates: Value, #[case] expected: Option<(f64, f64)>) {
        let governorate: Governorate = serde_json::from_value(json!({
            "id": 3,
            "name": "Ben Arous",
            "coordinates": coordinates
        }))
        .expect("malformed coordinates must not fail the dataset");

        assert_eq!(
            governorate.location.map(|c| (c.x, c.y)),
            expected
        );
    }

    #[rstest]
    fn missing_coordinates_default_to_none() {
        let governorate: Governorate =
            serde_json::from_value(json!({ "id": 3, "name": "Ben Arous" })).expect("parse");
        assert!(governorate.location.is_none());
    }

    #[rstest]
    fn rejects_unusable_ids() {
        let result: Result<GovernorateSet, _> = serde_json::from_value(json!({
            "governorates": [{ "id": "north", "name": "Bizerte" }]
        }));
        assert!(result.is_err());
    }

    #[rstest]
    fn duplicate_ids_keep_first_entry() {
        let set = GovernorateSet::new(vec![
            Governorate::new(GovernorateId::new(1), "Tunis"),
            Governorate::new(GovernorateId::new(2), "Ariana"),
            Governorate::new(GovernorateId::new(1), "Tunis (duplicate)"),
        ]);
        let names: Vec<&str> = set.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Tunis", "Ariana"]);
        assert_eq!(
            set.get(GovernorateId::new(1)).map(|g| g.name.as_str()),
            Some("Tunis")
        );
    }

    #[rstest]
    fn coordinates_serialise_as_lat_lng() {
        let tunis = Governorate::new(GovernorateId::new(1), "Tunis").with_coordinates(36.8, 10.18);
        let value = serde_json::to_value(&tunis).expect("serialise");
        assert_eq!(value["coordinates"], json!([36.8, 10.18]));
    }
}
