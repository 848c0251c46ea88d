//! The typed bundle of every dataset loaded at start-up.

use crate::{
    Advisor, GlobalIndicators, GovernorateDetails, GovernorateId, GovernorateSet,
    InvestmentMetrics, Sector, SectorCatalog,
};

/// All datasets, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    /// Country-level indicators from the global CSV.
    pub indicators: GlobalIndicators,
    /// Governorate reference data.
    pub governorates: GovernorateSet,
    /// Sector attributes keyed by sector name.
    pub sectors: SectorCatalog,
    /// Pre-computed investment scores.
    pub metrics: InvestmentMetrics,
}

impl Datasets {
    /// Bundle decoded datasets.
    #[must_use]
    pub const fn new(
        indicators: GlobalIndicators,
        governorates: GovernorateSet,
        sectors: SectorCatalog,
        metrics: InvestmentMetrics,
    ) -> Self {
        Self {
            indicators,
            governorates,
            sectors,
            metrics,
        }
    }

    /// Advisor over these datasets with the default recommendation count.
    #[must_use]
    pub const fn advisor(&self) -> Advisor<'_> {
        Advisor::new(self)
    }

    /// Detail view for governorate `id`.
    #[must_use]
    pub fn details(&self, id: GovernorateId, sector: Option<&Sector>) -> Option<GovernorateDetails> {
        GovernorateDetails::resolve(self, id, sector)
    }

    /// Report whether `sector` is a key of the sector dataset.
    #[must_use]
    pub fn is_known_sector(&self, sector: &Sector) -> bool {
        self.sectors.contains(sector)
    }
}
