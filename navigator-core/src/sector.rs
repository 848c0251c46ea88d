//! Economic sectors and their per-governorate attribute records.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::GovernorateId;

/// Name of an economic sector such as `tourism` or `agriculture`.
///
/// Names are trimmed and lowercased on construction so lookups are
/// case-insensitive.
///
/// # Examples
/// ```
/// use navigator_core::Sector;
///
/// assert_eq!(Sector::new(" Tourism ").as_str(), "tourism");
/// assert_eq!(Sector::new("manufacturing").title(), "Manufacturing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sector(String);

impl Sector {
    /// Normalise and wrap a sector name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// Return the normalised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the name with its first letter capitalised, for headings.
    #[must_use]
    pub fn title(&self) -> String {
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sector {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::str::FromStr for Sector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl<'de> Deserialize<'de> for Sector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Sector-specific attributes for one governorate.
///
/// Attributes are free-form (arable land share, hotel capacity, ...) and are
/// kept as JSON values ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    /// Governorate this record describes.
    pub governorate_id: GovernorateId,
    /// Remaining attributes of the record.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SectorRecord {
    /// Construct an empty record for `governorate_id`.
    #[must_use]
    pub fn new(governorate_id: GovernorateId) -> Self {
        Self {
            governorate_id,
            attributes: Map::new(),
        }
    }

    /// Add an attribute, replacing any previous value under `key`.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Fetch an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// One sector bucket: the records for every governorate that has data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorData {
    /// Records in source order.
    #[serde(default)]
    pub governorates: Vec<SectorRecord>,
}

impl SectorData {
    /// Build a bucket from records.
    #[must_use]
    pub const fn new(governorates: Vec<SectorRecord>) -> Self {
        Self { governorates }
    }

    /// Return the first record for `id`, if any.
    #[must_use]
    pub fn record(&self, id: GovernorateId) -> Option<&SectorRecord> {
        self.governorates.iter().find(|r| r.governorate_id == id)
    }
}

/// The sector dataset: sector name to bucket.
///
/// The keys of this catalogue define which sectors are known. Deserialises
/// from a JSON object keyed by sector name. Keys that collide once
/// lowercased keep the first bucket and log a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectorCatalog {
    sectors: BTreeMap<Sector, SectorData>,
}

impl SectorCatalog {
    /// Report whether `sector` is a known key.
    #[must_use]
    pub fn contains(&self, sector: &Sector) -> bool {
        self.sectors.contains_key(sector)
    }

    /// Fetch the bucket for `sector`.
    #[must_use]
    pub fn get(&self, sector: &Sector) -> Option<&SectorData> {
        self.sectors.get(sector)
    }

    /// Known sectors in name order.
    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.keys()
    }

    /// Fetch the record of governorate `id` within `sector`.
    #[must_use]
    pub fn record(&self, sector: &Sector, id: GovernorateId) -> Option<&SectorRecord> {
        self.get(sector).and_then(|data| data.record(id))
    }

    /// Number of known sectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Report whether no sectors are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl FromIterator<(Sector, SectorData)> for SectorCatalog {
    fn from_iter<I: IntoIterator<Item = (Sector, SectorData)>>(iter: I) -> Self {
        let mut sectors = BTreeMap::new();
        for (sector, data) in iter {
            if sectors.contains_key(&sector) {
                warn!("Duplicate sector {sector}; keeping the first entry");
                continue;
            }
            sectors.insert(sector, data);
        }
        Self { sectors }
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = SectorCatalog;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping sector names to buckets")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(entry) = map.next_entry::<Sector, SectorData>()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for SectorCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}
