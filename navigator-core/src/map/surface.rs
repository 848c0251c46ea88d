//! The rendering collaborator seam.

use geo::{Coord, MultiPolygon};

use crate::{MarkerStyle, ShapeStyle};

/// Handle a surface hands out for each drawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    /// Wrap a surface-specific index.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Return the surface-specific index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A map toolkit able to draw and restyle governorate shapes.
///
/// Implementations must return distinct [`ShapeId`]s for every drawn shape
/// and accept them back in the restyle and popup calls.
pub trait MapSurface {
    /// Draw a boundary polygon.
    fn draw_polygon(&mut self, geometry: &MultiPolygon<f64>, style: &ShapeStyle) -> ShapeId;

    /// Draw a circle marker centred on `at` (`x` longitude, `y` latitude).
    fn draw_circle_marker(&mut self, at: Coord<f64>, style: &MarkerStyle) -> ShapeId;

    /// Replace the style of a polygon.
    fn restyle_polygon(&mut self, shape: ShapeId, style: &ShapeStyle);

    /// Replace the style of a marker.
    fn restyle_marker(&mut self, shape: ShapeId, style: &MarkerStyle);

    /// Attach or replace the popup text of a shape.
    fn bind_popup(&mut self, shape: ShapeId, content: &str);
}
