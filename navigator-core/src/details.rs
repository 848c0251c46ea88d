//! Detail view of a single governorate.

use serde::Serialize;
use serde_json::Value;

use crate::{Datasets, Governorate, GovernorateId, ScoreLookup, ScoreOrigin, ScoreRecord, Sector};

/// Record attributes that duplicate governorate reference data.
const HIDDEN_ATTRIBUTES: [&str; 2] = ["governorate_id", "name"];

/// Everything shown when a governorate is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernorateDetails {
    /// Reference data.
    pub governorate: Governorate,
    /// Sector the details were resolved for, if any.
    pub sector: Option<Sector>,
    /// Sector attributes as `(key, value)` pairs in key order.
    pub attributes: Vec<(String, Value)>,
    /// Score for the sector; unscored when no sector is selected.
    pub score: ScoreRecord,
    /// Provenance of `score`.
    pub origin: ScoreOrigin,
}

impl GovernorateDetails {
    /// Resolve details for `id`, optionally within `sector`.
    ///
    /// Returns `None` when the governorate is unknown. An unknown or absent
    /// sector yields no attributes and an unscored record.
    #[must_use]
    pub fn resolve(datasets: &Datasets, id: GovernorateId, sector: Option<&Sector>) -> Option<Self> {
        let governorate = datasets.governorates.get(id)?.clone();
        let attributes = sector
            .and_then(|s| datasets.sectors.record(s, id))
            .map(|record| {
                record
                    .attributes
                    .iter()
                    .filter(|(key, _)| !HIDDEN_ATTRIBUTES.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let recorded = sector.and_then(|s| datasets.metrics.lookup(id, s));
        let origin = if recorded.is_some() {
            ScoreOrigin::Recorded
        } else {
            ScoreOrigin::Unscored
        };
        let score = recorded.unwrap_or(ScoreRecord::unscored()).clone();
        Some(Self {
            governorate,
            sector: sector.cloned(),
            attributes,
            score,
            origin,
        })
    }

    /// Attributes formatted for display: underscores become spaces and
    /// arrays are joined with commas.
    #[must_use]
    pub fn display_attributes(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .map(|(key, value)| (attribute_label(key), display_value(value)))
            .collect()
    }
}

/// Human-readable label for an attribute key.
#[must_use]
pub fn attribute_label(key: &str) -> String {
    key.replace('_', " ")
}

/// Render a JSON value the way detail views show it.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => "N/A".to_owned(),
        other => other.to_string(),
    }
}
