//! Project scores onto map shapes.
//!
//! The projector starts `Uninitialized` and moves exactly once: to
//! `Boundary` when boundary geometry loaded, or to `Marker` when it did not.
//! Sector changes restyle every shape in place and never change the mode.

use std::fmt::Display;

use log::{info, warn};

use super::{BoundarySet, MapError, MapSurface, ShapeId};
use crate::{
    Governorate, GovernorateId, MarkerStyle, ScoreLookup, ScoreTier, Sector, ShapeStyle,
};

/// Rendering strategy currently in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Nothing drawn yet.
    Uninitialized,
    /// Governorates drawn as boundary polygons.
    Boundary,
    /// Governorates drawn as point markers.
    Marker,
}

/// Kind of shape drawn for a governorate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Boundary polygon.
    Polygon,
    /// Circle marker.
    Marker,
}

/// Bookkeeping for one drawn shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedShape {
    /// Surface handle.
    pub shape: ShapeId,
    /// Kind of shape.
    pub kind: ShapeKind,
    /// Governorate the shape represents, if it could be joined.
    pub governorate: Option<GovernorateId>,
    /// Label used in popups.
    pub name: String,
    /// Tier currently applied.
    pub tier: ScoreTier,
}

/// Render-mode state machine and score-to-style projection.
#[derive(Debug, Clone)]
pub struct MapProjector {
    mode: RenderMode,
    sector: Option<Sector>,
    shapes: Vec<RenderedShape>,
}

impl Default for MapProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl MapProjector {
    /// Create an uninitialised projector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: RenderMode::Uninitialized,
            sector: None,
            shapes: Vec::new(),
        }
    }

    /// Current render mode.
    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Sector whose scores are currently applied.
    #[must_use]
    pub const fn sector(&self) -> Option<&Sector> {
        self.sector.as_ref()
    }

    /// Shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[RenderedShape] {
        &self.shapes
    }

    /// Number of markers drawn; zero in boundary mode.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|shape| shape.kind == ShapeKind::Marker)
            .count()
    }

    /// Draw the map from the outcome of the boundary fetch.
    ///
    /// A successful fetch draws one polygon per feature. A failed fetch is
    /// logged and falls back to one marker per governorate with
    /// coordinates; it is not returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::AlreadyInitialised`] when called a second time.
    pub fn initialise<E, S>(
        &mut self,
        boundaries: Result<BoundarySet, E>,
        governorates: &[Governorate],
        scores: &S,
        surface: &mut dyn MapSurface,
    ) -> Result<RenderMode, MapError>
    where
        E: Display,
        S: ScoreLookup + ?Sized,
    {
        if self.mode != RenderMode::Uninitialized {
            return Err(MapError::AlreadyInitialised);
        }
        match boundaries {
            Ok(set) => {
                self.draw_boundaries(&set, scores, surface);
                self.mode = RenderMode::Boundary;
                info!("Drew {} governorate boundaries", self.shapes.len());
            }
            Err(err) => {
                warn!("Failed to load governorate boundaries: {err}; falling back to markers");
                self.draw_markers(governorates, scores, surface);
                self.mode = RenderMode::Marker;
                info!("Drew {} governorate markers", self.shapes.len());
            }
        }
        Ok(self.mode)
    }

    /// Apply `sector` scores to every drawn shape.
    ///
    /// Returns the number of shapes restyled.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NotInitialised`] before [`MapProjector::initialise`].
    pub fn select_sector<S>(
        &mut self,
        sector: Sector,
        scores: &S,
        surface: &mut dyn MapSurface,
    ) -> Result<usize, MapError>
    where
        S: ScoreLookup + ?Sized,
    {
        if self.mode == RenderMode::Uninitialized {
            return Err(MapError::NotInitialised);
        }
        self.sector = Some(sector);
        let sector_ref = self.sector.as_ref();
        for shape in &mut self.shapes {
            let score = score_of(shape.governorate, sector_ref, scores);
            shape.tier = ScoreTier::for_score(score);
            match shape.kind {
                ShapeKind::Polygon => {
                    surface.restyle_polygon(shape.shape, &ShapeStyle::for_tier(shape.tier));
                }
                ShapeKind::Marker => {
                    surface.restyle_marker(shape.shape, &MarkerStyle::for_tier(shape.tier));
                    surface.bind_popup(shape.shape, &marker_popup(&shape.name, sector_ref, score));
                }
            }
        }
        Ok(self.shapes.len())
    }

    /// Tier applied to governorate `id`, if it is drawn.
    #[must_use]
    pub fn tier_of(&self, id: GovernorateId) -> Option<ScoreTier> {
        self.feature_at(id).map(|shape| shape.tier)
    }

    /// Shape drawn for governorate `id`.
    #[must_use]
    pub fn feature_at(&self, id: GovernorateId) -> Option<&RenderedShape> {
        self.shapes
            .iter()
            .find(|shape| shape.governorate == Some(id))
    }

    /// Governorate behind a clicked shape.
    #[must_use]
    pub fn governorate_at(&self, shape: ShapeId) -> Option<GovernorateId> {
        self.shapes
            .iter()
            .find(|rendered| rendered.shape == shape)
            .and_then(|rendered| rendered.governorate)
    }

    /// Apply the hover style to a polygon. Markers are left unchanged.
    ///
    /// Returns whether the shape was restyled.
    pub fn highlight(&self, shape: ShapeId, surface: &mut dyn MapSurface) -> bool {
        self.restyle_polygon_with(shape, surface, ShapeStyle::highlighted)
    }

    /// Restore the resting style of a polygon after hover.
    ///
    /// Returns whether the shape was restyled.
    pub fn reset_highlight(&self, shape: ShapeId, surface: &mut dyn MapSurface) -> bool {
        self.restyle_polygon_with(shape, surface, ShapeStyle::for_tier)
    }

    fn restyle_polygon_with(
        &self,
        shape: ShapeId,
        surface: &mut dyn MapSurface,
        style: fn(ScoreTier) -> ShapeStyle,
    ) -> bool {
        let Some(rendered) = self
            .shapes
            .iter()
            .find(|r| r.shape == shape && r.kind == ShapeKind::Polygon)
        else {
            return false;
        };
        surface.restyle_polygon(shape, &style(rendered.tier));
        true
    }

    fn draw_boundaries<S>(&mut self, set: &BoundarySet, scores: &S, surface: &mut dyn MapSurface)
    where
        S: ScoreLookup + ?Sized,
    {
        for feature in set.features() {
            let score = score_of(feature.governorate_id, self.sector.as_ref(), scores);
            let tier = ScoreTier::for_score(score);
            let shape = surface.draw_polygon(&feature.geometry, &ShapeStyle::for_tier(tier));
            surface.bind_popup(shape, &feature.name);
            self.shapes.push(RenderedShape {
                shape,
                kind: ShapeKind::Polygon,
                governorate: feature.governorate_id,
                name: feature.name.clone(),
                tier,
            });
        }
    }

    fn draw_markers<S>(
        &mut self,
        governorates: &[Governorate],
        scores: &S,
        surface: &mut dyn MapSurface,
    ) where
        S: ScoreLookup + ?Sized,
    {
        for governorate in governorates {
            let Some(location) = governorate.location else {
                warn!(
                    "Skipping governorate {} due to missing or invalid coordinates",
                    governorate.name
                );
                continue;
            };
            let score = score_of(Some(governorate.id), self.sector.as_ref(), scores);
            let tier = ScoreTier::for_score(score);
            let shape = surface.draw_circle_marker(location, &MarkerStyle::for_tier(tier));
            surface.bind_popup(
                shape,
                &marker_popup(&governorate.name, self.sector.as_ref(), score),
            );
            self.shapes.push(RenderedShape {
                shape,
                kind: ShapeKind::Marker,
                governorate: Some(governorate.id),
                name: governorate.name.clone(),
                tier,
            });
        }
    }
}

fn score_of<S>(id: Option<GovernorateId>, sector: Option<&Sector>, scores: &S) -> Option<f64>
where
    S: ScoreLookup + ?Sized,
{
    scores.score_for(id?, sector?)
}

fn marker_popup(name: &str, sector: Option<&Sector>, score: Option<f64>) -> String {
    let label = sector.map_or_else(|| "Overall".to_owned(), Sector::title);
    let value = score.map_or_else(|| "N/A".to_owned(), |s| s.to_string());
    format!("{name}\nScore ({label}): {value}/100")
}
