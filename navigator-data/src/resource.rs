//! Descriptors naming the datasets to load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Payload format of a dataset resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON document.
    Json,
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        })
    }
}

/// A dataset location and the format it is expected in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Location relative to the source root, such as `data/sector-data.json`.
    pub location: String,
    /// Expected payload format.
    pub format: DatasetFormat,
}

impl ResourceDescriptor {
    /// Describe a CSV resource.
    #[must_use]
    pub fn csv(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            format: DatasetFormat::Csv,
        }
    }

    /// Describe a JSON resource.
    #[must_use]
    pub fn json(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            format: DatasetFormat::Json,
        }
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.format)
    }
}

/// Locations of the standard dataset files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    /// Global happiness and inflation indicators.
    pub indicators: String,
    /// Governorate reference data.
    pub governorates: String,
    /// Sector attributes per governorate.
    pub sectors: String,
    /// Pre-computed investment scores.
    pub metrics: String,
    /// Optional governorate boundary polygons.
    pub boundaries: String,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            indicators: "data/WHI_Inflation.csv".to_owned(),
            governorates: "data/tunisia-governorates.json".to_owned(),
            sectors: "data/sector-data.json".to_owned(),
            metrics: "data/investment-metrics.json".to_owned(),
            boundaries: "data/tunisia-boundaries.geojson".to_owned(),
        }
    }
}

impl DatasetPaths {
    /// The four required resources in load order: indicators, governorates,
    /// sectors, metrics.
    #[must_use]
    pub fn required(&self) -> [ResourceDescriptor; 4] {
        [
            ResourceDescriptor::csv(self.indicators.as_str()),
            ResourceDescriptor::json(self.governorates.as_str()),
            ResourceDescriptor::json(self.sectors.as_str()),
            ResourceDescriptor::json(self.metrics.as_str()),
        ]
    }
}
