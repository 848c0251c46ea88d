//! Command-line interface for the Tunisia investment navigator.
//!
//! Every command loads the four datasets from a directory or an HTTP base
//! URL, then ranks, maps or describes governorates. Options merge CLI
//! flags, configuration files and `NAVIGATOR_CMDS_*` environment variables.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

mod data;
mod details;
mod error;
mod highlights;
mod map;
mod rank;
mod render;

pub use error::CliError;

use details::{DetailsArgs, run_details};
use highlights::{HighlightsArgs, run_highlights};
use map::{MapArgs, run_map};
use rank::{RankArgs, run_rank};

pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_SECTOR: &str = "sector";
pub(crate) const ARG_TOP: &str = "top";
pub(crate) const ARG_GOVERNORATE: &str = "governorate";
pub(crate) const ARG_COUNTRY: &str = "country";
pub(crate) const ENV_RANK_SECTOR: &str = "NAVIGATOR_CMDS_RANK_SECTOR";
pub(crate) const ENV_MAP_SECTOR: &str = "NAVIGATOR_CMDS_MAP_SECTOR";
pub(crate) const ENV_DETAILS_GOVERNORATE: &str = "NAVIGATOR_CMDS_DETAILS_GOVERNORATE";

/// Country whose indicators `highlights` reports when none is given.
pub(crate) const DEFAULT_COUNTRY: &str = "Tunisia";

/// Run the navigator CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments are invalid, datasets fail to load
/// or the command cannot complete.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Map(args) => run_map(args),
        Command::Details(args) => run_details(args),
        Command::Highlights(args) => run_highlights(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "navigator",
    about = "Explore investment scores for Tunisian governorates",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank governorates for a sector.
    Rank(RankArgs),
    /// Project sector scores onto the governorate map.
    Map(MapArgs),
    /// Show everything known about one governorate.
    Details(DetailsArgs),
    /// Summarise the latest economic indicators for a country.
    Highlights(HighlightsArgs),
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::Serialise)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::Write)?;
    writer.write_all(b"\n").map_err(CliError::Write)
}

#[cfg(test)]
mod tests;
