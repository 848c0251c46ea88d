//! Facade crate for the Tunisia investment navigator.
//!
//! This crate re-exports the core domain types and, behind the `data`
//! feature, the dataset loader.

#![forbid(unsafe_code)]

pub use navigator_core::{
    Advisor, AuthError, AuthSession, BoundarySet, Datasets, GlobalIndicators, Governorate,
    GovernorateDetails, GovernorateId, IdentityProvider, InvestmentMetrics, MapProjector,
    MapSurface, Navigator, NavigatorError, NavigatorEvent, RankError, RankedEntry, RenderMode,
    ScoreLookup, ScoreRecord, ScoreTier, Sector, SectorCatalog, UserProfile, rank,
};

#[cfg(feature = "data")]
pub use navigator_data::{
    DatasetLoader, DatasetPaths, DatasetSource, DirDatasetSource, HttpDatasetSource,
    HttpDatasetSourceConfig, LoadError, TransportError,
};
