//! `details` command: one governorate, optionally within a sector.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use navigator_core::{GovernorateId, RankError, Sector};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::data::{DataConfig, DefaultSourceBuilder, SourceBuilder, load_datasets};
use crate::{
    ARG_BASE_URL, ARG_DATA_DIR, ARG_FORMAT, ARG_GOVERNORATE, ARG_SECTOR, ARG_TIMEOUT_SECS,
    CliError, ENV_DETAILS_GOVERNORATE, OutputFormat, render, write_json,
};

/// CLI arguments for the `details` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Show reference data, sector data and score for a governorate")]
#[ortho_config(prefix = "NAVIGATOR")]
pub(crate) struct DetailsArgs {
    /// Numeric governorate id.
    #[arg(long = ARG_GOVERNORATE, value_name = "id")]
    #[serde(default)]
    pub(crate) governorate: Option<u32>,
    /// Sector whose attributes and score to include.
    #[arg(long = ARG_SECTOR, value_name = "sector")]
    #[serde(default)]
    pub(crate) sector: Option<String>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Directory containing the `data/` files.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Base URL serving the `data/` files.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-file fetch timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl DetailsArgs {
    pub(crate) fn into_config(self) -> Result<DetailsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DetailsConfig::try_from(merged)
    }
}

/// Resolved `details` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DetailsConfig {
    pub(crate) governorate: GovernorateId,
    pub(crate) sector: Option<Sector>,
    pub(crate) format: OutputFormat,
    pub(crate) data: DataConfig,
}

impl TryFrom<DetailsArgs> for DetailsConfig {
    type Error = CliError;

    fn try_from(args: DetailsArgs) -> Result<Self, Self::Error> {
        let governorate = args.governorate.ok_or(CliError::MissingArgument {
            field: ARG_GOVERNORATE,
            env: ENV_DETAILS_GOVERNORATE,
        })?;
        Ok(Self {
            governorate: GovernorateId::new(governorate),
            sector: args.sector.map(Sector::new),
            format: args.format.unwrap_or_default(),
            data: DataConfig::resolve(args.data_dir, args.base_url, args.timeout_secs)?,
        })
    }
}

pub(crate) fn run_details(args: DetailsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_details_with(args, &DefaultSourceBuilder, &mut stdout)
}

pub(crate) fn run_details_with(
    args: DetailsArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let datasets = load_datasets(&config.data, builder)?;
    if let Some(sector) = config
        .sector
        .as_ref()
        .filter(|sector| !datasets.is_known_sector(sector))
    {
        return Err(RankError::UnknownSector {
            sector: sector.clone(),
        }
        .into());
    }
    let details = datasets
        .details(config.governorate, config.sector.as_ref())
        .ok_or(CliError::UnknownGovernorate {
            id: config.governorate,
        })?;
    match config.format {
        OutputFormat::Json => write_json(writer, &details),
        OutputFormat::Text => render::write_details(writer, &details).map_err(CliError::Write),
    }
}
