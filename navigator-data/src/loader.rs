//! Concurrent, all-or-nothing dataset loading.

use std::time::Duration;

use futures_util::future::try_join_all;
use log::{debug, info};
use navigator_core::{BoundarySet, Datasets, GlobalIndicators};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    CsvTable, DatasetFormat, DatasetPaths, DatasetSource, LoadError, ResourceDescriptor,
    TransportError, decode_boundaries, parse_csv,
};

/// Fetch timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A parsed but not yet typed dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// A CSV table.
    Csv(CsvTable),
    /// A JSON document.
    Json(Value),
}

impl Dataset {
    /// The CSV table, if this is one.
    #[must_use]
    pub const fn as_csv(&self) -> Option<&CsvTable> {
        match self {
            Self::Csv(table) => Some(table),
            Self::Json(_) => None,
        }
    }

    /// The JSON document, if this is one.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Csv(_) => None,
        }
    }
}

/// Loads datasets from a [`DatasetSource`].
///
/// Each fetch is bounded by the loader's timeout. Cancelling the token
/// returned by [`DatasetLoader::cancellation_token`] aborts whatever is in
/// flight with [`LoadError::Cancelled`]. Failed fetches are not retried.
#[derive(Debug)]
pub struct DatasetLoader<S> {
    source: S,
    timeout: Duration,
    cancel: CancellationToken,
}

impl<S: DatasetSource> DatasetLoader<S> {
    /// Create a loader with [`DEFAULT_TIMEOUT`] and a fresh cancellation
    /// token.
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the per-fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Observe `token` instead of the loader's own.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels loads in progress.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Per-fetch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The underlying source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and parse every resource concurrently.
    ///
    /// Results are in request order. The batch completes when every fetch
    /// succeeds or as soon as one fails; the remaining fetches are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`], which names the failing resource.
    pub async fn load_batch(
        &self,
        resources: &[ResourceDescriptor],
    ) -> Result<Vec<Dataset>, LoadError> {
        try_join_all(resources.iter().map(|resource| self.load(resource))).await
    }

    /// Load the four required datasets and decode them.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure, or a malformed-content error naming
    /// the resource whose contents did not decode.
    pub async fn load_all_data(&self, paths: &DatasetPaths) -> Result<Datasets, LoadError> {
        let (indicators, governorates, sectors, metrics) = futures_util::try_join!(
            self.load_indicators(&paths.indicators),
            self.load_json(&paths.governorates),
            self.load_json(&paths.sectors),
            self.load_json(&paths.metrics),
        )?;
        let datasets = Datasets::new(indicators, governorates, sectors, metrics);
        info!(
            "Loaded {} indicator rows, {} governorates and {} sectors",
            datasets.indicators.len(),
            datasets.governorates.len(),
            datasets.sectors.len()
        );
        Ok(datasets)
    }

    /// Fetch and decode the optional boundary file.
    ///
    /// # Errors
    ///
    /// Returns a transport error or [`LoadError::MalformedGeoJson`]. Callers
    /// usually hand the error to the map projector, which falls back to
    /// markers.
    pub async fn load_boundaries(&self, location: &str) -> Result<BoundarySet, LoadError> {
        let bytes = self.fetch(location).await?;
        let set = decode_boundaries(&bytes).map_err(|source| LoadError::MalformedGeoJson {
            resource: location.to_owned(),
            source,
        })?;
        info!("Loaded {} boundary features from {location}", set.len());
        Ok(set)
    }

    async fn load(&self, resource: &ResourceDescriptor) -> Result<Dataset, LoadError> {
        let bytes = self.fetch(&resource.location).await?;
        match resource.format {
            DatasetFormat::Csv => parse_table(&resource.location, &bytes).map(Dataset::Csv),
            DatasetFormat::Json => decode_json(&resource.location, &bytes).map(Dataset::Json),
        }
    }

    async fn load_indicators(&self, location: &str) -> Result<GlobalIndicators, LoadError> {
        let bytes = self.fetch(location).await?;
        let table = parse_table(location, &bytes)?;
        Ok(table.to_indicators())
    }

    async fn load_json<T: DeserializeOwned>(&self, location: &str) -> Result<T, LoadError> {
        let bytes = self.fetch(location).await?;
        decode_json(location, &bytes)
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        debug!("Loading {location}");
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(LoadError::Cancelled {
                resource: location.to_owned(),
            }),
            outcome = tokio::time::timeout(self.timeout, self.source.fetch(location)) => {
                let source = match outcome {
                    Ok(Ok(bytes)) => return Ok(bytes),
                    Ok(Err(source)) => source,
                    Err(_elapsed) => TransportError::Timeout {
                        location: location.to_owned(),
                        timeout: self.timeout,
                    },
                };
                Err(LoadError::Transport {
                    resource: location.to_owned(),
                    source,
                })
            }
        }
    }
}

fn parse_table(location: &str, bytes: &[u8]) -> Result<CsvTable, LoadError> {
    parse_csv(bytes).map_err(|source| LoadError::MalformedCsv {
        resource: location.to_owned(),
        source,
    })
}

fn decode_json<T: DeserializeOwned>(location: &str, bytes: &[u8]) -> Result<T, LoadError> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::MalformedJson {
        resource: location.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubResponse, StubSource, block_on_for_tests, sample_source};
    use navigator_core::test_support::sample_datasets;
    use navigator_core::{GovernorateId, ScoreLookup, Sector};
    use rstest::{fixture, rstest};

    #[fixture]
    fn paths() -> DatasetPaths {
        DatasetPaths::default()
    }

    #[rstest]
    fn loads_and_decodes_the_standard_datasets(paths: DatasetPaths) {
        let loader = DatasetLoader::new(sample_source());
        let datasets = block_on_for_tests(loader.load_all_data(&paths)).expect("all load");
        assert_eq!(datasets, sample_datasets());
        let tourism = Sector::new("tourism");
        assert_eq!(
            datasets.metrics.score_for(GovernorateId::new(2), &tourism),
            Some(88.0)
        );
    }

    #[rstest]
    fn batch_results_follow_request_order(paths: DatasetPaths) {
        let loader = DatasetLoader::new(sample_source());
        let mut resources = paths.required().to_vec();
        resources.reverse();
        let loaded = block_on_for_tests(loader.load_batch(&resources)).expect("batch loads");
        assert_eq!(loaded.len(), 4);
        assert!(loaded.first().and_then(Dataset::as_json).is_some());
        assert!(loaded.last().and_then(Dataset::as_csv).is_some());
    }

    #[rstest]
    fn an_empty_batch_is_empty() {
        let loader = DatasetLoader::new(StubSource::new());
        let loaded = block_on_for_tests(loader.load_batch(&[])).expect("nothing to load");
        assert!(loaded.is_empty());
    }

    #[rstest]
    fn one_missing_resource_fails_the_batch(paths: DatasetPaths) {
        let source = sample_source().with_response(&paths.sectors, StubResponse::Status(404));
        let loader = DatasetLoader::new(source);
        let err = block_on_for_tests(loader.load_all_data(&paths)).expect_err("404 fails");
        assert_eq!(err.resource(), paths.sectors);
        assert!(err.is_transport());
        assert!(matches!(
            err,
            LoadError::Transport {
                source: TransportError::Http { status: 404, .. },
                ..
            }
        ));
    }

    #[rstest]
    fn non_numeric_ids_are_malformed(paths: DatasetPaths) {
        let source = sample_source().with_body(
            &paths.governorates,
            br#"{"governorates":[{"id":"Tunis","name":"Tunis"}]}"#.to_vec(),
        );
        let loader = DatasetLoader::new(source);
        let err = block_on_for_tests(loader.load_all_data(&paths)).expect_err("bad id");
        assert!(err.is_malformed());
        assert_eq!(err.resource(), paths.governorates);
    }

    #[rstest]
    fn slow_fetches_time_out(paths: DatasetPaths) {
        let source = sample_source().with_response(&paths.metrics, StubResponse::Hang);
        let loader = DatasetLoader::new(source).with_timeout(Duration::from_millis(20));
        let err = block_on_for_tests(loader.load_all_data(&paths)).expect_err("times out");
        assert!(err.is_timeout());
        assert_eq!(err.resource(), paths.metrics);
    }

    #[rstest]
    fn cancellation_aborts_the_batch(paths: DatasetPaths) {
        let source = sample_source().with_response(&paths.metrics, StubResponse::Hang);
        let loader = DatasetLoader::new(source);
        loader.cancellation_token().cancel();
        let err = block_on_for_tests(loader.load_all_data(&paths)).expect_err("cancelled");
        assert!(matches!(err, LoadError::Cancelled { .. }));
    }

    #[rstest]
    fn boundaries_decode_and_report_their_location(paths: DatasetPaths) {
        let loader = DatasetLoader::new(sample_source());
        let set = block_on_for_tests(loader.load_boundaries(&paths.boundaries))
            .expect("boundaries load");
        assert_eq!(set.len(), 2);

        let broken = DatasetLoader::new(
            StubSource::new().with_body(&paths.boundaries, b"{\"type\":\"Topology\"}".to_vec()),
        );
        let err = block_on_for_tests(broken.load_boundaries(&paths.boundaries))
            .expect_err("not a collection");
        assert!(matches!(err, LoadError::MalformedGeoJson { .. }));
    }
}
