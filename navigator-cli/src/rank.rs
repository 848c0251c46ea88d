//! `rank` command: top governorates for a sector.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use navigator_core::{DEFAULT_RECOMMENDATIONS, RankedEntry, Sector};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::data::{DataConfig, DefaultSourceBuilder, SourceBuilder, load_datasets};
use crate::{
    ARG_BASE_URL, ARG_DATA_DIR, ARG_FORMAT, ARG_SECTOR, ARG_TIMEOUT_SECS, ARG_TOP, CliError,
    ENV_RANK_SECTOR, OutputFormat, render, write_json,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank governorates by their pre-computed investment score for \
                 one sector. Governorates without a score are listed last as \
                 unscored.",
    about = "Rank governorates for a sector"
)]
#[ortho_config(prefix = "NAVIGATOR")]
pub(crate) struct RankArgs {
    /// Sector to rank (for example "tourism").
    #[arg(long = ARG_SECTOR, value_name = "sector")]
    #[serde(default)]
    pub(crate) sector: Option<String>,
    /// Number of recommendations to print.
    #[arg(long = ARG_TOP, value_name = "count")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
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

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    pub(crate) sector: Sector,
    pub(crate) top: usize,
    pub(crate) format: OutputFormat,
    pub(crate) data: DataConfig,
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let sector = args.sector.ok_or(CliError::MissingArgument {
            field: ARG_SECTOR,
            env: ENV_RANK_SECTOR,
        })?;
        Ok(Self {
            sector: Sector::new(sector),
            top: args.top.unwrap_or(DEFAULT_RECOMMENDATIONS),
            format: args.format.unwrap_or_default(),
            data: DataConfig::resolve(args.data_dir, args.base_url, args.timeout_secs)?,
        })
    }
}

#[derive(Serialize)]
struct RankingReport<'a> {
    sector: &'a Sector,
    recommendations: &'a [RankedEntry<'a>],
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &DefaultSourceBuilder, &mut stdout)
}

pub(crate) fn run_rank_with(
    args: RankArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let datasets = load_datasets(&config.data, builder)?;
    let recommendations = datasets
        .advisor()
        .with_top_n(config.top)
        .recommend(&config.sector)?;
    match config.format {
        OutputFormat::Json => write_json(
            writer,
            &RankingReport {
                sector: &config.sector,
                recommendations: &recommendations,
            },
        ),
        OutputFormat::Text => {
            render::write_ranking(writer, &config.sector, &recommendations).map_err(CliError::Write)
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
