//! Error types produced while loading datasets.

use std::{io, time::Duration};

use thiserror::Error;

use crate::geojson::GeoJsonError;

/// Transport-level failures raised by a [`crate::DatasetSource`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server answered with an error status.
    #[error("request to {location} failed with status {status}: {message}")]
    Http {
        /// Requested location or URL.
        location: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request could not be completed.
    #[error("network error fetching {location}: {source}")]
    Network {
        /// Requested location or URL.
        location: String,
        /// Underlying transport error.
        source: io::Error,
    },
    /// The fetch did not finish within the configured timeout.
    #[error("fetching {location} timed out after {timeout:?}")]
    Timeout {
        /// Requested location or URL.
        location: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Reading a local file failed.
    #[error("failed to read {location}: {source}")]
    Io {
        /// Requested location.
        location: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The location could not be joined onto the base URL.
    #[error("invalid dataset location {location}: {source}")]
    InvalidUrl {
        /// Requested location.
        location: String,
        /// URL parse failure.
        source: url::ParseError,
    },
}

/// Errors that make dataset loading fail.
///
/// Every variant except [`LoadError::Cancelled`] names the resource that
/// failed, so callers can report which file to fix.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The resource could not be fetched.
    #[error("failed to fetch {resource}: {source}")]
    Transport {
        /// Resource location.
        resource: String,
        /// Transport failure.
        source: TransportError,
    },
    /// The batch was cancelled before it completed.
    #[error("loading {resource} was cancelled")]
    Cancelled {
        /// Resource that was in flight when cancellation was observed.
        resource: String,
    },
    /// A JSON resource did not parse or did not match the expected shape.
    #[error("malformed JSON in {resource}: {source}")]
    MalformedJson {
        /// Resource location.
        resource: String,
        /// Parse or decode error.
        source: serde_json::Error,
    },
    /// A CSV resource could not be read.
    #[error("malformed CSV in {resource}: {source}")]
    MalformedCsv {
        /// Resource location.
        resource: String,
        /// Reader error.
        source: csv::Error,
    },
    /// A GeoJSON resource did not describe usable boundaries.
    #[error("malformed GeoJSON in {resource}: {source}")]
    MalformedGeoJson {
        /// Resource location.
        resource: String,
        /// Decode error.
        source: GeoJsonError,
    },
}

impl LoadError {
    /// Location of the resource the error refers to.
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::Transport { resource, .. }
            | Self::Cancelled { resource }
            | Self::MalformedJson { resource, .. }
            | Self::MalformedCsv { resource, .. }
            | Self::MalformedGeoJson { resource, .. } => resource,
        }
    }

    /// Report whether the failure happened before any content arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Report whether the content arrived but could not be understood.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedJson { .. } | Self::MalformedCsv { .. } | Self::MalformedGeoJson { .. }
        )
    }

    /// Report whether the failure was an elapsed fetch timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                source: TransportError::Timeout { .. },
                ..
            }
        )
    }
}
