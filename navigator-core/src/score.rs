//! Pre-computed investment scores and the resolver seam.
//!
//! Scores are produced offline and shipped in the investment-metrics
//! dataset. Nothing here recomputes a score: a missing record resolves to
//! the shared [`ScoreRecord::unscored`] value and callers that need to tell
//! the two apart use [`ScoreLookup::lookup`].

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{GovernorateId, Sector};

/// Upper bound of the score scale.
pub const MAX_SCORE: f64 = 100.0;

/// Pre-computed score for one (governorate, sector) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Raw total as stored in the dataset; read it through
    /// [`ScoreRecord::total`] or [`ScoreRecord::recorded_total`].
    #[serde(default)]
    pub total_score: Option<f64>,
    /// Component name to sub-score.
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    /// Strengths in display order.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Challenges in display order.
    #[serde(default)]
    pub challenges: Vec<String>,
    /// Opportunities in display order.
    #[serde(default)]
    pub opportunities: Vec<String>,
}

static UNSCORED: ScoreRecord = ScoreRecord {
    total_score: None,
    components: BTreeMap::new(),
    strengths: Vec::new(),
    challenges: Vec::new(),
    opportunities: Vec::new(),
};

impl ScoreRecord {
    /// Build a record carrying only a total.
    ///
    /// # Examples
    /// ```
    /// use navigator_core::ScoreRecord;
    ///
    /// assert_eq!(ScoreRecord::with_total(72.0).total(), 72.0);
    /// assert_eq!(ScoreRecord::with_total(140.0).total(), 100.0);
    /// ```
    #[must_use]
    pub fn with_total(total: f64) -> Self {
        Self {
            total_score: Some(total),
            ..Self::default()
        }
    }

    /// The shared record returned for pairs with no data.
    #[must_use]
    pub fn unscored() -> &'static Self {
        &UNSCORED
    }

    /// Clamp and validate a raw total.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=100.0`.
    #[must_use]
    pub fn sanitise(score: f64) -> f64 {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, MAX_SCORE)
    }

    /// The sanitised total, or `None` when the record carries no total.
    #[must_use]
    pub fn recorded_total(&self) -> Option<f64> {
        self.total_score.map(Self::sanitise)
    }

    /// The sanitised total, treating an absent total as `0.0`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.recorded_total().unwrap_or(0.0)
    }
}

/// Weights of the offline scoring methodology.
///
/// Loaded for display only; the navigator never derives scores from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringMethodology {
    /// Component name to weight.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

/// Resolve pre-computed scores by governorate and sector.
///
/// Implementors only provide [`ScoreLookup::lookup`]; resolution never fails
/// and substitutes [`ScoreRecord::unscored`] for missing pairs.
///
/// # Examples
///
/// ```
/// use navigator_core::{GovernorateId, InvestmentMetrics, ScoreLookup, Sector};
///
/// let metrics = InvestmentMetrics::default();
/// let record = metrics.resolve(GovernorateId::new(4), &Sector::new("tourism"));
/// assert_eq!(record.total(), 0.0);
/// assert!(record.strengths.is_empty());
/// ```
pub trait ScoreLookup {
    /// Return the stored record for `id` in `sector`, if any.
    fn lookup(&self, id: GovernorateId, sector: &Sector) -> Option<&ScoreRecord>;

    /// Return the stored record or the shared unscored default.
    fn resolve(&self, id: GovernorateId, sector: &Sector) -> &ScoreRecord {
        self.lookup(id, sector).unwrap_or(ScoreRecord::unscored())
    }

    /// Return the recorded total, or `None` when the pair is unscored.
    fn score_for(&self, id: GovernorateId, sector: &Sector) -> Option<f64> {
        self.lookup(id, sector).and_then(ScoreRecord::recorded_total)
    }
}

#[derive(Deserialize)]
struct GovernorateScores {
    governorate_id: GovernorateId,
    #[serde(default)]
    sectors: BTreeMap<Sector, ScoreRecord>,
}

#[derive(Deserialize)]
struct MetricsFile {
    #[serde(default)]
    governorate_scores: Vec<GovernorateScores>,
    #[serde(default)]
    scoring_methodology: ScoringMethodology,
}

/// The investment-metrics dataset indexed by sector then governorate.
///
/// Deserialises from `{ "governorate_scores": [...], "scoring_methodology":
/// { "weights": {...} } }`. If a governorate appears more than once the
/// first entry wins and later ones are logged and ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "MetricsFile")]
pub struct InvestmentMetrics {
    scores: HashMap<Sector, HashMap<GovernorateId, ScoreRecord>>,
    methodology: ScoringMethodology,
}

impl InvestmentMetrics {
    /// Build metrics from `(governorate, sector, record)` triples.
    ///
    /// The first triple for a pair wins.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (GovernorateId, Sector, ScoreRecord)>,
    {
        let mut metrics = Self::default();
        for (id, sector, record) in records {
            metrics.insert_first(id, sector, record);
        }
        metrics
    }

    /// Attach the scoring methodology.
    #[must_use]
    pub fn with_methodology(mut self, methodology: ScoringMethodology) -> Self {
        self.methodology = methodology;
        self
    }

    /// Weights of the offline scoring methodology.
    #[must_use]
    pub const fn methodology(&self) -> &ScoringMethodology {
        &self.methodology
    }

    /// Sectors that have at least one score.
    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.scores.keys()
    }

    fn insert_first(&mut self, id: GovernorateId, sector: Sector, record: ScoreRecord) {
        let bucket = self.scores.entry(sector).or_default();
        if bucket.contains_key(&id) {
            warn!("Duplicate score entry for governorate {id}; keeping the first entry");
            return;
        }
        bucket.insert(id, record);
    }
}

impl From<MetricsFile> for InvestmentMetrics {
    fn from(file: MetricsFile) -> Self {
        let triples = file.governorate_scores.into_iter().flat_map(|entry| {
            let id = entry.governorate_id;
            entry
                .sectors
                .into_iter()
                .map(move |(sector, record)| (id, sector, record))
        });
        Self::from_records(triples).with_methodology(file.scoring_methodology)
    }
}

impl ScoreLookup for InvestmentMetrics {
    fn lookup(&self, id: GovernorateId, sector: &Sector) -> Option<&ScoreRecord> {
        self.scores.get(sector).and_then(|bucket| bucket.get(&id))
    }
}
