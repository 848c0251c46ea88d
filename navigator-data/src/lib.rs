//! Dataset loading for the Tunisia investment navigator.
//!
//! Responsibilities:
//! - Fetch dataset bytes from a [`DatasetSource`] (HTTP, a local directory,
//!   or an in-memory stub).
//! - Parse CSV and JSON payloads and decode them into the typed
//!   [`navigator_core::Datasets`] bundle.
//! - Decode the optional GeoJSON boundary file into a
//!   [`navigator_core::BoundarySet`].
//!
//! Boundaries:
//! - Scoring, ranking and styling rules live in `navigator-core`.
//! - Fetches run concurrently on the calling task; no threads are spawned
//!   except for blocking file reads.
//!
//! Invariants:
//! - A batch either yields every dataset in request order or fails with the
//!   first error. Nothing partial is returned.
//! - Every fetch is bounded by the loader's timeout and observes its
//!   cancellation token.
#![forbid(unsafe_code)]

mod dir;
mod error;
pub mod geojson;
mod loader;
mod resource;
mod source;
mod table;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dir::DirDatasetSource;
pub use error::{LoadError, TransportError};
pub use geojson::{GeoJsonError, decode_boundaries};
pub use loader::{DEFAULT_TIMEOUT, Dataset, DatasetLoader};
pub use resource::{DatasetFormat, DatasetPaths, ResourceDescriptor};
pub use source::{
    DEFAULT_USER_AGENT, DatasetSource, HttpDatasetSource, HttpDatasetSourceConfig,
    SourceBuildError,
};
pub use table::{CsvTable, parse_csv};
