//! Application wiring: datasets, map, subscribers and session state.
//!
//! [`Navigator`] is constructed with its collaborators and reacts to
//! [`NavigatorEvent`]s. It validates each event before changing state, so a
//! rejected event leaves the navigator untouched.

use std::fmt::Display;

use log::{debug, warn};
use thiserror::Error;

use crate::{
    BoundarySet, Datasets, EventBus, GovernorateDetails, GovernorateId, MapError, MapProjector,
    MapSurface, NavigatorEvent, RankError, RankedEntry, RenderMode, Sector, ShapeId, UserProfile,
    rank, DEFAULT_RECOMMENDATIONS,
};

/// Errors raised while handling an event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigatorError {
    /// A sector event named a sector missing from the sector dataset.
    #[error(transparent)]
    Rank(#[from] RankError),
    /// A click referred to a governorate that is not loaded.
    #[error("unknown governorate {id}")]
    UnknownGovernorate {
        /// Governorate that was clicked.
        id: GovernorateId,
    },
    /// The map state machine was misused.
    #[error(transparent)]
    Map(#[from] MapError),
}

/// What changed as a result of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Update<'a> {
    /// The signed-in user changed.
    Session {
        /// User now signed in, if any.
        user: Option<UserProfile>,
    },
    /// A sector was selected.
    Sector {
        /// Selected sector.
        sector: Sector,
        /// Top recommendations for the sector.
        recommendations: Vec<RankedEntry<'a>>,
        /// Number of map shapes restyled.
        restyled: usize,
    },
    /// A governorate was opened.
    Details(GovernorateDetails),
}

/// The navigator application state.
pub struct Navigator<M> {
    datasets: Datasets,
    projector: MapProjector,
    surface: M,
    bus: EventBus,
    selected: Option<Sector>,
    user: Option<UserProfile>,
    top_n: usize,
}

impl<M: MapSurface> Navigator<M> {
    /// Wire loaded datasets to a map surface.
    pub fn new(datasets: Datasets, surface: M) -> Self {
        Self {
            datasets,
            projector: MapProjector::new(),
            surface,
            bus: EventBus::new(),
            selected: None,
            user: None,
            top_n: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Override the number of recommendations per sector.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Draw the map from the outcome of the boundary fetch.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Map`] if the map was already drawn.
    pub fn initialise_map<E: Display>(
        &mut self,
        boundaries: Result<BoundarySet, E>,
    ) -> Result<RenderMode, NavigatorError> {
        let mode = self.projector.initialise(
            boundaries,
            self.datasets.governorates.as_slice(),
            &self.datasets.metrics,
            &mut self.surface,
        )?;
        if let Some(sector) = self.selected.clone() {
            self.projector
                .select_sector(sector, &self.datasets.metrics, &mut self.surface)?;
        }
        Ok(mode)
    }

    /// Handle `event` and forward it to subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::Rank`] for unknown sectors and
    /// [`NavigatorError::UnknownGovernorate`] for clicks on governorates
    /// that are not loaded. Subscribers are not notified of rejected events.
    pub fn dispatch(&mut self, event: NavigatorEvent) -> Result<Update<'_>, NavigatorError> {
        match event {
            NavigatorEvent::SignedIn(profile) => {
                self.user = Some(profile.clone());
                self.bus.publish(&NavigatorEvent::SignedIn(profile));
                Ok(Update::Session {
                    user: self.user.clone(),
                })
            }
            NavigatorEvent::SignedOut => {
                self.user = None;
                self.bus.publish(&NavigatorEvent::SignedOut);
                Ok(Update::Session { user: None })
            }
            NavigatorEvent::SectorSelected(sector) => self.select_sector(sector),
            NavigatorEvent::FeatureClicked(id) => self.open_governorate(id),
        }
    }

    fn select_sector(&mut self, sector: Sector) -> Result<Update<'_>, NavigatorError> {
        if !self.datasets.is_known_sector(&sector) {
            return Err(RankError::UnknownSector { sector }.into());
        }
        let restyled = match self.projector.select_sector(
            sector.clone(),
            &self.datasets.metrics,
            &mut self.surface,
        ) {
            Ok(count) => count,
            Err(MapError::NotInitialised) => {
                warn!("Map not drawn yet; {sector} styling applies once it is");
                0
            }
            Err(err) => return Err(err.into()),
        };
        self.selected = Some(sector.clone());
        self.bus
            .publish(&NavigatorEvent::SectorSelected(sector.clone()));
        debug!("Selected sector {sector}; restyled {restyled} shapes");

        let recommendations = rank(
            &sector,
            self.datasets.governorates.as_slice(),
            &self.datasets.sectors,
            &self.datasets.metrics,
            self.top_n,
        )?;
        Ok(Update::Sector {
            sector,
            recommendations,
            restyled,
        })
    }

    fn open_governorate(&mut self, id: GovernorateId) -> Result<Update<'_>, NavigatorError> {
        let details = self
            .datasets
            .details(id, self.selected.as_ref())
            .ok_or(NavigatorError::UnknownGovernorate { id })?;
        self.bus.publish(&NavigatorEvent::FeatureClicked(id));
        Ok(Update::Details(details))
    }

    /// Translate a click on a map shape into an event.
    #[must_use]
    pub fn click(&self, shape: ShapeId) -> Option<NavigatorEvent> {
        self.projector
            .governorate_at(shape)
            .map(NavigatorEvent::FeatureClicked)
    }

    /// Apply the hover style to a polygon.
    pub fn hover(&mut self, shape: ShapeId) -> bool {
        self.projector.highlight(shape, &mut self.surface)
    }

    /// Restore the resting style after hover.
    pub fn unhover(&mut self, shape: ShapeId) -> bool {
        self.projector.reset_highlight(shape, &mut self.surface)
    }

    /// Register a subscriber for forwarded events.
    pub fn subscribe<F>(&mut self, subscriber: F) -> crate::SubscriptionId
    where
        F: FnMut(&NavigatorEvent) + 'static,
    {
        self.bus.subscribe(subscriber)
    }

    /// Loaded datasets.
    pub const fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Map state machine.
    pub const fn projector(&self) -> &MapProjector {
        &self.projector
    }

    /// Rendering surface.
    pub const fn surface(&self) -> &M {
        &self.surface
    }

    /// Currently selected sector.
    pub const fn selected_sector(&self) -> Option<&Sector> {
        self.selected.as_ref()
    }

    /// Currently signed-in user.
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

impl<M> std::fmt::Debug for Navigator<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("projector", &self.projector)
            .field("bus", &self.bus)
            .field("selected", &self.selected)
            .field("user", &self.user)
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingSurface, sample_datasets};
    use crate::{ScoreTier, ShapeKind};
    use rstest::{fixture, rstest};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[fixture]
    fn navigator() -> Navigator<RecordingSurface> {
        Navigator::new(sample_datasets(), RecordingSurface::default())
    }

    #[rstest]
    fn sector_selection_ranks_and_restyles(mut navigator: Navigator<RecordingSurface>) {
        navigator
            .initialise_map(Err::<BoundarySet, _>("boundaries unavailable"))
            .expect("first initialise");

        let update = navigator
            .dispatch(NavigatorEvent::SectorSelected(Sector::new("Tourism")))
            .expect("tourism is known");

        let Update::Sector {
            recommendations,
            restyled,
            ..
        } = update
        else {
            panic!("expected a sector update");
        };
        assert_eq!(restyled, navigator_markers());
        let names: Vec<_> = recommendations
            .iter()
            .map(|e| e.governorate.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sousse", "Tunis", "Kairouan"]);
        assert_eq!(
            navigator.projector().tier_of(GovernorateId::new(2)),
            Some(ScoreTier::High)
        );
    }

    fn navigator_markers() -> usize {
        sample_datasets()
            .governorates
            .iter()
            .filter(|g| g.location.is_some())
            .count()
    }

    #[rstest]
    fn unknown_sector_changes_nothing(mut navigator: Navigator<RecordingSurface>) {
        let forwarded = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&forwarded);
        navigator.subscribe(move |_| *counter.borrow_mut() += 1);

        let err = navigator
            .dispatch(NavigatorEvent::SectorSelected(Sector::new("fishing")))
            .expect_err("unknown sector");

        assert!(matches!(err, NavigatorError::Rank(_)));
        assert!(navigator.selected_sector().is_none());
        assert_eq!(*forwarded.borrow(), 0);
    }

    #[rstest]
    fn clicks_resolve_details_for_selected_sector(mut navigator: Navigator<RecordingSurface>) {
        navigator
            .initialise_map(Err::<BoundarySet, _>("offline"))
            .expect("initialise");
        navigator
            .dispatch(NavigatorEvent::SectorSelected(Sector::new("tourism")))
            .expect("known sector");
        let shape = navigator
            .projector()
            .feature_at(GovernorateId::new(2))
            .filter(|s| s.kind == ShapeKind::Marker)
            .map(|s| s.shape)
            .expect("Sousse marker");

        let event = navigator.click(shape).expect("marker is joined");
        let Update::Details(details) = navigator.dispatch(event).expect("known governorate") else {
            panic!("expected details");
        };
        assert_eq!(details.governorate.name, "Sousse");
        assert!(!details.attributes.is_empty());
    }

    #[rstest]
    fn unknown_governorate_click_is_an_error(mut navigator: Navigator<RecordingSurface>) {
        let err = navigator
            .dispatch(NavigatorEvent::FeatureClicked(GovernorateId::new(404)))
            .expect_err("unknown governorate");
        assert_eq!(
            err,
            NavigatorError::UnknownGovernorate {
                id: GovernorateId::new(404)
            }
        );
    }

    #[rstest]
    fn session_events_track_user(mut navigator: Navigator<RecordingSurface>) {
        let profile = UserProfile {
            uid: "u1".to_owned(),
            email: "amira@example.tn".to_owned(),
            display_name: Some("Amira".to_owned()),
            email_verified: true,
        };
        navigator
            .dispatch(NavigatorEvent::SignedIn(profile.clone()))
            .expect("sign in");
        assert_eq!(navigator.user(), Some(&profile));
        navigator
            .dispatch(NavigatorEvent::SignedOut)
            .expect("sign out");
        assert!(navigator.user().is_none());
    }

    #[rstest]
    fn sector_before_map_still_ranks(mut navigator: Navigator<RecordingSurface>) {
        let update = navigator
            .dispatch(NavigatorEvent::SectorSelected(Sector::new("agriculture")))
            .expect("known sector");
        assert!(matches!(update, Update::Sector { restyled: 0, .. }));

        navigator
            .initialise_map(Err::<BoundarySet, _>("offline"))
            .expect("initialise");
        assert_eq!(
            navigator.projector().sector(),
            Some(&Sector::new("agriculture"))
        );
    }
}
