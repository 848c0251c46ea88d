//! `highlights` command: latest economic indicators for a country.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use navigator_core::{
    GDP_COLUMN, GlobalIndicators, HAPPINESS_COLUMN, INFLATION_COLUMN, ScatterPoint, Series,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::data::{DataConfig, DefaultSourceBuilder, SourceBuilder, load_datasets};
use crate::{
    ARG_BASE_URL, ARG_COUNTRY, ARG_DATA_DIR, ARG_FORMAT, ARG_TIMEOUT_SECS, CliError,
    DEFAULT_COUNTRY, OutputFormat, render, write_json,
};

/// `(label, column, unit suffix)` for each reported indicator.
const HIGHLIGHT_COLUMNS: &[(&str, &str, &str)] = &[
    ("Latest inflation", INFLATION_COLUMN, "%"),
    ("GDP per capita", GDP_COLUMN, " USD"),
    ("Happiness score", HAPPINESS_COLUMN, ""),
];

/// CLI arguments for the `highlights` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Report the most recent inflation, GDP per capita and \
                 happiness figures for a country. JSON output also carries \
                 the inflation comparison series and the happiness against \
                 GDP scatter data.",
    about = "Summarise economic indicators for a country"
)]
#[ortho_config(prefix = "NAVIGATOR")]
pub(crate) struct HighlightsArgs {
    /// Country to summarise; defaults to Tunisia.
    #[arg(long = ARG_COUNTRY, value_name = "name")]
    #[serde(default)]
    pub(crate) country: Option<String>,
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

impl HighlightsArgs {
    pub(crate) fn into_config(self) -> Result<HighlightsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HighlightsConfig::try_from(merged)
    }
}

/// Resolved `highlights` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HighlightsConfig {
    pub(crate) country: String,
    pub(crate) format: OutputFormat,
    pub(crate) data: DataConfig,
}

impl TryFrom<HighlightsArgs> for HighlightsConfig {
    type Error = CliError;

    fn try_from(args: HighlightsArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            country: args.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
            format: args.format.unwrap_or_default(),
            data: DataConfig::resolve(args.data_dir, args.base_url, args.timeout_secs)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct HighlightsReport {
    country: String,
    year: Option<i32>,
    inflation: Option<f64>,
    gdp_per_capita: Option<f64>,
    happiness: Option<f64>,
    inflation_comparison: Vec<Series>,
    happiness_vs_gdp: Vec<ScatterPoint>,
}

impl HighlightsReport {
    fn build(indicators: &GlobalIndicators, country: &str) -> Self {
        let latest = indicators.latest_for(country);
        let number = |column: &str| latest.and_then(|row| row.number(column));
        Self {
            country: country.to_owned(),
            year: latest.and_then(navigator_core::IndicatorRow::year),
            inflation: number(INFLATION_COLUMN),
            gdp_per_capita: number(GDP_COLUMN),
            happiness: number(HAPPINESS_COLUMN),
            inflation_comparison: indicators.comparison_series(),
            happiness_vs_gdp: indicators.happiness_vs_gdp(),
        }
    }
}

pub(crate) fn run_highlights(args: HighlightsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_highlights_with(args, &DefaultSourceBuilder, &mut stdout)
}

pub(crate) fn run_highlights_with(
    args: HighlightsArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let datasets = load_datasets(&config.data, builder)?;
    match config.format {
        OutputFormat::Json => write_json(
            writer,
            &HighlightsReport::build(&datasets.indicators, &config.country),
        ),
        OutputFormat::Text => render::write_highlights(
            writer,
            &config.country,
            datasets.indicators.latest_for(&config.country),
            HIGHLIGHT_COLUMNS,
        )
        .map_err(CliError::Write),
    }
}
