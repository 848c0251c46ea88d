//! Errors raised by the map projector.

use thiserror::Error;

/// Misuse of the render-mode state machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// `initialise` was called on a projector that already left
    /// `Uninitialized`.
    #[error("map is already initialised")]
    AlreadyInitialised,
    /// A styling operation ran before `initialise`.
    #[error("map has not been initialised")]
    NotInitialised,
}
