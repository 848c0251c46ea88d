//! Map rendering: boundary polygons with a marker fallback.
//!
//! [`MapProjector`] owns the render-mode state machine and translates scores
//! into styles; drawing is delegated to a [`MapSurface`] implementation so
//! the core stays independent of any mapping toolkit.

mod boundary;
mod error;
mod projector;
mod surface;

pub use boundary::{BoundaryFeature, BoundarySet, GOVERNORATE_ID_PROPERTIES};
pub use error::MapError;
pub use projector::{MapProjector, RenderMode, RenderedShape, ShapeKind};
pub use surface::{MapSurface, ShapeId};
