#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for the map render-mode state machine.

use std::cell::RefCell;

use geo::{LineString, MultiPolygon, Polygon};
use navigator_core::test_support::{RecordingSurface, SurfaceCall, sample_metrics};
use navigator_core::{
    BoundaryFeature, BoundarySet, Governorate, GovernorateId, InvestmentMetrics, MapProjector,
    RenderMode, ScoreTier, Sector, ShapeKind,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Projector, surface and inputs shared by the map scenarios.
pub struct TestContext {
    governorates: RefCell<Vec<Governorate>>,
    metrics: InvestmentMetrics,
    projector: RefCell<MapProjector>,
    surface: RefCell<RecordingSurface>,
}

#[fixture]
/// Build a context around the sample score dataset.
pub fn context() -> TestContext {
    TestContext {
        governorates: RefCell::new(Vec::new()),
        metrics: sample_metrics(),
        projector: RefCell::new(MapProjector::new()),
        surface: RefCell::new(RecordingSurface::default()),
    }
}

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    let ring = LineString::from(vec![(x, y), (x + 0.5, y), (x + 0.5, y + 0.5), (x, y)]);
    MultiPolygon::new(vec![Polygon::new(ring, Vec::new())])
}

fn initialise(context: &TestContext, boundaries: Result<BoundarySet, String>) {
    let governorates = context.governorates.borrow();
    let mut surface = context.surface.borrow_mut();
    context
        .projector
        .borrow_mut()
        .initialise(boundaries, &governorates, &context.metrics, &mut *surface)
        .expect("first initialise succeeds");
}

fn select(context: &TestContext, sector: &str) {
    let mut surface = context.surface.borrow_mut();
    context
        .projector
        .borrow_mut()
        .select_sector(Sector::new(sector), &context.metrics, &mut *surface)
        .expect("map is initialised");
}

#[given("governorates where one has no coordinates")]
fn governorates_with_gap(context: &TestContext) {
    *context.governorates.borrow_mut() = vec![
        Governorate::new(GovernorateId::new(1), "Tunis").with_coordinates(36.8, 10.18),
        Governorate::new(GovernorateId::new(2), "Sousse").with_coordinates(35.83, 10.64),
        Governorate::new(GovernorateId::new(3), "Kairouan").with_coordinates(35.68, 10.1),
        Governorate::new(GovernorateId::new(4), "Tozeur"),
    ];
}

#[when("the boundary fetch fails with a network error")]
fn boundary_fetch_fails(context: &TestContext) {
    initialise(context, Err("connection reset by peer".to_owned()));
}

#[when("the boundaries load successfully")]
fn boundaries_load(context: &TestContext) {
    let set: BoundarySet = [
        BoundaryFeature::new(Some(GovernorateId::new(1)), "Tunis", square(10.0, 36.6)),
        BoundaryFeature::new(Some(GovernorateId::new(2)), "Sousse", square(10.4, 35.6)),
    ]
    .into_iter()
    .collect();
    initialise(context, Ok(set));
}

#[when("the tourism sector is selected")]
fn tourism_selected(context: &TestContext) {
    select(context, "tourism");
}

#[when("the manufacturing sector is selected")]
fn manufacturing_selected(context: &TestContext) {
    select(context, "manufacturing");
}

#[then("the map is in marker mode")]
fn in_marker_mode(context: &TestContext) {
    assert_eq!(context.projector.borrow().mode(), RenderMode::Marker);
}

#[then("the map is in boundary mode")]
fn in_boundary_mode(context: &TestContext) {
    assert_eq!(context.projector.borrow().mode(), RenderMode::Boundary);
}

#[then("one marker is drawn per governorate with coordinates")]
fn one_marker_each(context: &TestContext) {
    let projector = context.projector.borrow();
    assert_eq!(projector.marker_count(), 3);
    assert_eq!(context.surface.borrow().marker_count(), 3);
    assert!(projector.feature_at(GovernorateId::new(4)).is_none());
    assert!(
        projector
            .shapes()
            .iter()
            .all(|shape| shape.kind == ShapeKind::Marker)
    );
}

#[then("Sousse is drawn in the high tier")]
fn sousse_high(context: &TestContext) {
    let projector = context.projector.borrow();
    assert_eq!(projector.tier_of(GovernorateId::new(2)), Some(ScoreTier::High));
    let shape = projector
        .feature_at(GovernorateId::new(2))
        .map(|s| s.shape)
        .expect("Sousse drawn");
    let restyled = context.surface.borrow().calls().iter().any(|call| {
        matches!(
            call,
            SurfaceCall::RestylePolygon { shape: target, style }
                if *target == shape && style.fill_colour == ScoreTier::High.colour()
        )
    });
    assert!(restyled, "expected Sousse to be restyled green");
}

#[then("every marker uses the unknown tier")]
fn all_unknown(context: &TestContext) {
    let projector = context.projector.borrow();
    assert!(
        projector
            .shapes()
            .iter()
            .all(|shape| shape.tier == ScoreTier::Unknown)
    );
}

#[scenario(path = "tests/features/map_fallback.feature", index = 0)]
fn boundary_failure_falls_back(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/map_fallback.feature", index = 1)]
fn sector_change_restyles_boundaries(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/map_fallback.feature", index = 2)]
fn unscored_render_unknown(context: TestContext) {
    let _ = context;
}
