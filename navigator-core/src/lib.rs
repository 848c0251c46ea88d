//! Core domain types for the Tunisia investment navigator.
//!
//! The crate joins governorate reference data, sector attributes and
//! pre-computed investment scores, then ranks governorates per sector and
//! projects scores onto map styling tiers. It performs no I/O: datasets are
//! loaded by `navigator-data` and rendering happens behind the
//! [`MapSurface`] trait.
//!
//! # Examples
//!
//! ```
//! use navigator_core::{
//!     Governorate, GovernorateId, InvestmentMetrics, ScoreRecord, Sector, SectorCatalog,
//!     SectorData, rank,
//! };
//!
//! let tourism = Sector::new("tourism");
//! let governorates = vec![
//!     Governorate::new(GovernorateId::new(1), "Tunis"),
//!     Governorate::new(GovernorateId::new(2), "Sousse"),
//! ];
//! let sectors = SectorCatalog::from_iter([(tourism.clone(), SectorData::default())]);
//! let metrics = InvestmentMetrics::from_records([
//!     (GovernorateId::new(1), tourism.clone(), ScoreRecord::with_total(64.0)),
//!     (GovernorateId::new(2), tourism.clone(), ScoreRecord::with_total(88.0)),
//! ]);
//!
//! let ranked = rank(&tourism, &governorates, &sectors, &metrics, 1)?;
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].governorate.name, "Sousse");
//! # Ok::<(), navigator_core::RankError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
mod datasets;
mod details;
mod events;
mod governorate;
mod indicators;
pub mod map;
mod navigator;
mod ranking;
mod score;
mod sector;
mod styling;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use auth::{AuthError, AuthSession, IdentityProvider, UserProfile, VerificationOutcome};
pub use datasets::Datasets;
pub use details::{GovernorateDetails, attribute_label, display_value};
pub use events::{EventBus, NavigatorEvent, SubscriptionId};
pub use governorate::{Governorate, GovernorateId, GovernorateSet};
pub use indicators::{
    COMPARISON_COUNTRIES, COUNTRY_COLUMN, GDP_COLUMN, GlobalIndicators, HAPPINESS_COLUMN,
    INFLATION_COLUMN, IndicatorRow, ScatterPoint, Series, YEAR_COLUMN,
};
pub use map::{
    BoundaryFeature, BoundarySet, MapError, MapProjector, MapSurface, RenderMode, RenderedShape,
    ShapeId, ShapeKind,
};
pub use navigator::{Navigator, NavigatorError, Update};
pub use ranking::{Advisor, DEFAULT_RECOMMENDATIONS, RankError, RankedEntry, ScoreOrigin, rank};
pub use score::{InvestmentMetrics, MAX_SCORE, ScoreLookup, ScoreRecord, ScoringMethodology};
pub use sector::{Sector, SectorCatalog, SectorData, SectorRecord};
pub use styling::{HIGH_THRESHOLD, MEDIUM_THRESHOLD, MarkerStyle, ScoreTier, ShapeStyle};
