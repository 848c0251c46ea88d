//! Resolving where datasets come from and loading them.

use std::time::Duration;

use camino::Utf8PathBuf;
use log::debug;
use navigator_core::{BoundarySet, Datasets};
use navigator_data::{
    DEFAULT_TIMEOUT, DatasetLoader, DatasetPaths, DatasetSource, DirDatasetSource,
    HttpDatasetSource, HttpDatasetSourceConfig, LoadError,
};

use crate::{ARG_BASE_URL, ARG_DATA_DIR, ARG_TIMEOUT_SECS, CliError};

/// Where the dataset files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DataLocation {
    /// A directory containing `data/`.
    Directory(Utf8PathBuf),
    /// A base URL serving `data/`.
    Http(String),
}

/// Resolved data options shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataConfig {
    pub(crate) location: DataLocation,
    pub(crate) timeout: Duration,
    pub(crate) paths: DatasetPaths,
}

impl DataConfig {
    /// Combine the merged data options.
    ///
    /// Without `--data-dir` or `--base-url` the current directory is read.
    pub(crate) fn resolve(
        data_dir: Option<Utf8PathBuf>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let location = match (data_dir, base_url) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_DATA_DIR,
                    second: ARG_BASE_URL,
                });
            }
            (None, Some(url)) => DataLocation::Http(url),
            (dir, None) => DataLocation::Directory(dir.unwrap_or_else(|| Utf8PathBuf::from("."))),
        };
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(CliError::ZeroTimeout {
                    field: ARG_TIMEOUT_SECS,
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            location,
            timeout,
            paths: DatasetPaths::default(),
        })
    }
}

/// Builds the dataset source for the current invocation.
pub(crate) trait SourceBuilder {
    fn build(&self, config: &DataConfig) -> Result<Box<dyn DatasetSource>, CliError>;
}

pub(crate) struct DefaultSourceBuilder;

impl SourceBuilder for DefaultSourceBuilder {
    fn build(&self, config: &DataConfig) -> Result<Box<dyn DatasetSource>, CliError> {
        match &config.location {
            DataLocation::Directory(path) => {
                let source = DirDatasetSource::open(path).map_err(|source| {
                    CliError::OpenDataDir {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(source))
            }
            DataLocation::Http(base_url) => {
                let http = HttpDatasetSourceConfig::new(base_url.clone()).with_timeout(config.timeout);
                let source = HttpDatasetSource::with_config(http).map_err(|source| {
                    CliError::BuildHttpSource {
                        base_url: base_url.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(source))
            }
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Load the four required datasets.
pub(crate) fn load_datasets(
    config: &DataConfig,
    builder: &dyn SourceBuilder,
) -> Result<Datasets, CliError> {
    let source = builder.build(config)?;
    let loader = DatasetLoader::new(&*source).with_timeout(config.timeout);
    let datasets = runtime()?.block_on(loader.load_all_data(&config.paths))?;
    Ok(datasets)
}

/// Load the required datasets, then the optional boundary file.
///
/// A failed boundary load is returned rather than raised so the map can
/// fall back to markers.
pub(crate) fn load_datasets_and_boundaries(
    config: &DataConfig,
    builder: &dyn SourceBuilder,
) -> Result<(Datasets, Result<BoundarySet, LoadError>), CliError> {
    let source = builder.build(config)?;
    let loader = DatasetLoader::new(&*source).with_timeout(config.timeout);
    runtime()?.block_on(async {
        let datasets = loader.load_all_data(&config.paths).await?;
        let boundaries = loader.load_boundaries(&config.paths.boundaries).await;
        if let Err(err) = &boundaries {
            debug!("Boundary load failed: {err}");
        }
        Ok::<_, CliError>((datasets, boundaries))
    })
}
