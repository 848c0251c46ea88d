//! Governorate boundary polygons.

use geo::MultiPolygon;
use serde_json::{Map, Value};

use crate::GovernorateId;

/// Feature properties that may carry the governorate id, in lookup order.
pub const GOVERNORATE_ID_PROPERTIES: [&str; 3] = ["id", "ID", "gov_id"];

const NAME_PROPERTIES: [&str; 2] = ["name", "NAME_EN"];

/// One boundary feature joined to a governorate where possible.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Governorate the polygon outlines, `None` when the feature carries no
    /// usable id.
    pub governorate_id: Option<GovernorateId>,
    /// Popup label.
    pub name: String,
    /// Outline geometry.
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryFeature {
    /// Construct a feature from explicit parts.
    #[must_use]
    pub fn new(
        governorate_id: Option<GovernorateId>,
        name: impl Into<String>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        Self {
            governorate_id,
            name: name.into(),
            geometry,
        }
    }

    /// Build a feature from its GeoJSON `properties` object.
    ///
    /// The id comes from the first present property among
    /// [`GOVERNORATE_ID_PROPERTIES`]. The label is `name`, then `NAME_EN`,
    /// then `ID: <raw id>`.
    ///
    /// # Examples
    /// ```
    /// use geo::MultiPolygon;
    /// use navigator_core::{BoundaryFeature, GovernorateId};
    /// use serde_json::json;
    ///
    /// let props = json!({ "gov_id": "7" });
    /// let feature = BoundaryFeature::from_properties(
    ///     props.as_object().expect("object"),
    ///     MultiPolygon::new(Vec::new()),
    /// );
    /// assert_eq!(feature.governorate_id, Some(GovernorateId::new(7)));
    /// assert_eq!(feature.name, "ID: 7");
    /// ```
    #[must_use]
    pub fn from_properties(properties: &Map<String, Value>, geometry: MultiPolygon<f64>) -> Self {
        let raw_id = first_present(properties, &GOVERNORATE_ID_PROPERTIES);
        let governorate_id = raw_id.and_then(GovernorateId::from_json);
        let name = first_present(properties, &NAME_PROPERTIES)
            .and_then(Value::as_str)
            .map_or_else(|| format!("ID: {}", raw_label(raw_id)), str::to_owned);
        Self {
            governorate_id,
            name,
            geometry,
        }
    }
}

fn first_present<'a>(properties: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| properties.get(*key))
        .find(|value| !value.is_null())
}

fn raw_label(raw_id: Option<&Value>) -> String {
    match raw_id {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_owned(),
    }
}

/// Decoded boundary file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

impl BoundarySet {
    /// Wrap features in source order.
    #[must_use]
    pub const fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features }
    }

    /// Features in source order.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// First feature outlining governorate `id`.
    #[must_use]
    pub fn feature_for(&self, id: GovernorateId) -> Option<&BoundaryFeature> {
        self.features
            .iter()
            .find(|feature| feature.governorate_id == Some(id))
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Report whether the set has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<BoundaryFeature> for BoundarySet {
    fn from_iter<I: IntoIterator<Item = BoundaryFeature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn feature(props: &Value) -> BoundaryFeature {
        BoundaryFeature::from_properties(
            props.as_object().expect("properties object"),
            MultiPolygon::new(Vec::new()),
        )
    }

    #[rstest]
    #[case(json!({ "id": 3, "name": "Ben Arous" }), Some(3), "Ben Arous")]
    #[case(json!({ "ID": "4", "NAME_EN": "Manouba" }), Some(4), "Manouba")]
    #[case(json!({ "gov_id": 5 }), Some(5), "ID: 5")]
    #[case(json!({ "id": null, "ID": 6 }), Some(6), "ID: 6")]
    #[case(json!({ "id": "north" }), None, "ID: north")]
    #[case(json!({}), None, "ID: unknown")]
    fn reads_id_and_label(
        #[case] props: Value,
        #[case] expected_id: Option<u32>,
        #[case] expected_name: &str,
    ) {
        let parsed = feature(&props);
        assert_eq!(parsed.governorate_id, expected_id.map(GovernorateId::new));
        assert_eq!(parsed.name, expected_name);
    }

    #[test]
    fn finds_feature_by_governorate() {
        let set: BoundarySet = [
            feature(&json!({ "id": 1, "name": "Tunis" })),
            feature(&json!({ "id": 2, "name": "Ariana" })),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            set.feature_for(GovernorateId::new(2)).map(|f| f.name.as_str()),
            Some("Ariana")
        );
        assert!(set.feature_for(GovernorateId::new(9)).is_none());
    }
}
