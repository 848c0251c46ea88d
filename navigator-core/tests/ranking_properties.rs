#![expect(
    clippy::expect_used,
    reason = "property fixtures use small, known-valid indices"
)]

//! Property-based tests for ranking and score tiers.
//!
//! # Invariants tested
//!
//! - **Bounded length:** rankings never exceed `top_n` or the number of
//!   governorates.
//! - **Ordering:** totals never increase along a ranking.
//! - **Stability:** equal totals keep their input order.
//! - **Tier monotonicity:** severity never rises as the score rises, and an
//!   unscored entry never shares a tier with a score of zero.

use navigator_core::{
    Governorate, GovernorateId, InvestmentMetrics, ScoreRecord, ScoreTier, Sector, SectorCatalog,
    SectorData, rank,
};
use proptest::prelude::*;

fn tourism() -> Sector {
    Sector::new("tourism")
}

/// Build governorates `0..n` and score each with the matching optional total.
fn fixture(totals: &[Option<u8>]) -> (Vec<Governorate>, SectorCatalog, InvestmentMetrics) {
    let governorates = (0..totals.len())
        .map(|i| {
            let id = u32::try_from(i).expect("small index");
            Governorate::new(GovernorateId::new(id), format!("G{id}"))
        })
        .collect();
    let sectors = SectorCatalog::from_iter([(tourism(), SectorData::default())]);
    let metrics = InvestmentMetrics::from_records(totals.iter().enumerate().filter_map(
        |(i, total)| {
            let id = u32::try_from(i).expect("small index");
            total.map(|t| {
                (
                    GovernorateId::new(id),
                    tourism(),
                    ScoreRecord::with_total(f64::from(t)),
                )
            })
        },
    ));
    (governorates, sectors, metrics)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rankings are bounded by both `top_n` and the input size.
    #[test]
    fn ranking_is_bounded(
        totals in prop::collection::vec(prop::option::of(0_u8..=100), 0..24),
        top_n in 0_usize..30,
    ) {
        let (governorates, sectors, metrics) = fixture(&totals);
        let ranked = rank(&tourism(), &governorates, &sectors, &metrics, top_n)
            .expect("tourism is known");
        prop_assert_eq!(ranked.len(), top_n.min(governorates.len()));
    }

    /// Totals are non-increasing and ties preserve governorate order.
    #[test]
    fn ranking_is_sorted_and_stable(
        totals in prop::collection::vec(prop::option::of(0_u8..=4), 1..24),
    ) {
        let (governorates, sectors, metrics) = fixture(&totals);
        let ranked = rank(&tourism(), &governorates, &sectors, &metrics, governorates.len())
            .expect("tourism is known");

        for pair in ranked.windows(2) {
            let [first, second] = pair else { continue };
            prop_assert!(first.total() >= second.total());
            if first.total().total_cmp(&second.total()).is_eq() {
                prop_assert!(first.governorate.id < second.governorate.id);
            }
        }
    }

    /// Severity never increases with the score.
    #[test]
    fn tier_severity_is_monotonic(a in 0.0_f64..=100.0, b in 0.0_f64..=100.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_tier = ScoreTier::for_score(Some(low));
        let high_tier = ScoreTier::for_score(Some(high));
        prop_assert!(high_tier.severity() <= low_tier.severity());
        prop_assert_ne!(ScoreTier::for_score(None), low_tier);
    }
}
