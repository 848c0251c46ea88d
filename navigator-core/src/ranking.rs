//! Rank governorates by their pre-computed score for a sector.

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Datasets, Governorate, ScoreLookup, ScoreRecord, Sector, SectorCatalog, SectorRecord};

/// Number of recommendations the dashboard shows per sector.
pub const DEFAULT_RECOMMENDATIONS: usize = 3;

/// Whether a ranked score came from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreOrigin {
    /// The metrics dataset holds a record for the pair.
    Recorded,
    /// No record exists; the entry carries the unscored default.
    Unscored,
}

/// A governorate joined with its sector record and score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedEntry<'a> {
    /// Governorate reference data.
    pub governorate: &'a Governorate,
    /// Sector attributes, `None` when the sector lists no record for the
    /// governorate.
    pub sector_record: Option<&'a SectorRecord>,
    /// Resolved score record.
    pub score: &'a ScoreRecord,
    /// Provenance of `score`.
    pub origin: ScoreOrigin,
}

impl RankedEntry<'_> {
    /// Sanitised total score used for ordering.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.score.total()
    }

    /// Sector attributes, `None` when the governorate has no record.
    #[must_use]
    pub fn sector_attributes(&self) -> Option<&Map<String, Value>> {
        self.sector_record.map(|record| &record.attributes)
    }
}

/// Errors raised by [`rank`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankError {
    /// The sector is not a key of the sector dataset.
    #[error("unknown sector '{sector}'")]
    UnknownSector {
        /// Sector that was requested.
        sector: Sector,
    },
}

/// Rank `governorates` by score in `sector` and keep the best `top_n`.
///
/// Every governorate is kept with its resolved score, including those with
/// no record. Entries sort by total descending; equal totals keep their input
/// order. The result is empty when no governorates are supplied.
///
/// # Errors
///
/// Returns [`RankError::UnknownSector`] when `sector` is not a key of
/// `sectors`.
///
/// # Examples
///
/// ```
/// use navigator_core::{
///     Governorate, GovernorateId, InvestmentMetrics, RankError, ScoreRecord, Sector,
///     SectorCatalog, SectorData, rank,
/// };
///
/// let sectors = SectorCatalog::from_iter([(Sector::new("tourism"), SectorData::default())]);
/// let metrics = InvestmentMetrics::default();
/// let err = rank(&Sector::new("fishing"), &[], &sectors, &metrics, 3).unwrap_err();
/// assert_eq!(err, RankError::UnknownSector { sector: Sector::new("fishing") });
/// ```
pub fn rank<'a, S>(
    sector: &Sector,
    governorates: &'a [Governorate],
    sectors: &'a SectorCatalog,
    scores: &'a S,
    top_n: usize,
) -> Result<Vec<RankedEntry<'a>>, RankError>
where
    S: ScoreLookup + ?Sized,
{
    let Some(bucket) = sectors.get(sector) else {
        return Err(RankError::UnknownSector {
            sector: sector.clone(),
        });
    };

    let mut entries: Vec<RankedEntry<'a>> = governorates
        .iter()
        .map(|governorate| {
            let (score, origin) = match scores.lookup(governorate.id, sector) {
                Some(record) => (record, ScoreOrigin::Recorded),
                None => {
                    debug!(
                        "No pre-computed {sector} score for {}; using the unscored default",
                        governorate.name
                    );
                    (ScoreRecord::unscored(), ScoreOrigin::Unscored)
                }
            };
            RankedEntry {
                governorate,
                sector_record: bucket.record(governorate.id),
                score,
                origin,
            }
        })
        .collect();

    // `sort_by` is stable, so equal totals keep governorate order.
    entries.sort_by(|a, b| b.total().total_cmp(&a.total()));
    entries.truncate(top_n);
    Ok(entries)
}

/// Produces per-sector recommendations from loaded datasets.
#[derive(Debug, Clone, Copy)]
pub struct Advisor<'a> {
    datasets: &'a Datasets,
    top_n: usize,
}

impl<'a> Advisor<'a> {
    /// Create an advisor returning [`DEFAULT_RECOMMENDATIONS`] entries.
    #[must_use]
    pub const fn new(datasets: &'a Datasets) -> Self {
        Self {
            datasets,
            top_n: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Override how many recommendations are returned.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Number of recommendations returned per call.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rank governorates for `sector`.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::UnknownSector`] for sectors missing from the
    /// sector dataset.
    pub fn recommend(&self, sector: &Sector) -> Result<Vec<RankedEntry<'a>>, RankError> {
        rank(
            sector,
            self.datasets.governorates.as_slice(),
            &self.datasets.sectors,
            &self.datasets.metrics,
            self.top_n,
        )
    }
}
