//! Error types emitted by the navigator CLI.
//!
//! Keep this error type reasonably small: every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use navigator_core::{GovernorateId, NavigatorError, RankError};
use navigator_data::{LoadError, SourceBuildError};
use thiserror::Error;

/// Errors emitted by the navigator CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Two options that select the same thing were both given.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        /// Option that was given first in the flag table.
        first: &'static str,
        /// Option that conflicts with it.
        second: &'static str,
    },
    /// The fetch timeout must be at least one second.
    #[error("--{field} must be greater than zero")]
    ZeroTimeout {
        /// Long flag name of the option.
        field: &'static str,
    },
    /// The data directory could not be opened.
    #[error("failed to open data directory {path:?}: {source}")]
    OpenDataDir {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP dataset source could not be constructed.
    #[error("failed to build HTTP source for {base_url:?}: {source}")]
    BuildHttpSource {
        /// Base URL that was requested.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: SourceBuildError,
    },
    /// The async runtime used for loading could not start.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Loading the datasets failed.
    #[error("failed to load datasets: {0}")]
    Load(#[from] LoadError),
    /// The requested sector could not be ranked.
    #[error(transparent)]
    Rank(#[from] RankError),
    /// The navigator rejected an event.
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
    /// The requested governorate is not in the dataset.
    #[error("unknown governorate {id}")]
    UnknownGovernorate {
        /// Governorate that was requested.
        id: GovernorateId,
    },
    /// Serialising JSON output failed.
    #[error("failed to serialise output: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
}
