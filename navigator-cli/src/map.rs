//! `map` command: project sector scores onto governorate shapes.
//!
//! The command drives a [`Navigator`] over a [`TextSurface`], which keeps
//! the latest style and popup of every shape so the result can be printed.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::{Coord, MultiPolygon};
use navigator_core::{
    MapSurface, MarkerStyle, Navigator, NavigatorEvent, RenderMode, Sector, ShapeId, ShapeKind,
    ShapeStyle, Update,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::data::{DataConfig, DefaultSourceBuilder, SourceBuilder, load_datasets_and_boundaries};
use crate::{
    ARG_BASE_URL, ARG_DATA_DIR, ARG_FORMAT, ARG_SECTOR, ARG_TIMEOUT_SECS, CliError,
    ENV_MAP_SECTOR, OutputFormat, write_json,
};

/// CLI arguments for the `map` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Draw the governorate map, using boundary polygons when the \
                 boundary file loads and point markers otherwise, then colour \
                 every shape by its score tier for the sector.",
    about = "Colour the governorate map by sector score"
)]
#[ortho_config(prefix = "NAVIGATOR")]
pub(crate) struct MapArgs {
    /// Sector whose scores colour the map.
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

impl MapArgs {
    pub(crate) fn into_config(self) -> Result<MapConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MapConfig::try_from(merged)
    }
}

/// Resolved `map` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MapConfig {
    pub(crate) sector: Sector,
    pub(crate) format: OutputFormat,
    pub(crate) data: DataConfig,
}

impl TryFrom<MapArgs> for MapConfig {
    type Error = CliError;

    fn try_from(args: MapArgs) -> Result<Self, Self::Error> {
        let sector = args.sector.ok_or(CliError::MissingArgument {
            field: ARG_SECTOR,
            env: ENV_MAP_SECTOR,
        })?;
        Ok(Self {
            sector: Sector::new(sector),
            format: args.format.unwrap_or_default(),
            data: DataConfig::resolve(args.data_dir, args.base_url, args.timeout_secs)?,
        })
    }
}

/// Last known state of one shape on a [`TextSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DrawnShape {
    pub(crate) fill_colour: &'static str,
    pub(crate) popup: Option<String>,
}

/// A [`MapSurface`] that keeps shapes in memory instead of drawing them.
#[derive(Debug, Default)]
pub(crate) struct TextSurface {
    shapes: Vec<DrawnShape>,
}

impl TextSurface {
    pub(crate) fn shape(&self, id: ShapeId) -> Option<&DrawnShape> {
        self.shapes.get(id.get())
    }

    fn push(&mut self, fill_colour: &'static str) -> ShapeId {
        self.shapes.push(DrawnShape {
            fill_colour,
            popup: None,
        });
        ShapeId::new(self.shapes.len() - 1)
    }

    fn restyle(&mut self, id: ShapeId, fill_colour: &'static str) {
        if let Some(shape) = self.shapes.get_mut(id.get()) {
            shape.fill_colour = fill_colour;
        }
    }
}

impl MapSurface for TextSurface {
    fn draw_polygon(&mut self, _geometry: &MultiPolygon<f64>, style: &ShapeStyle) -> ShapeId {
        self.push(style.fill_colour)
    }

    fn draw_circle_marker(&mut self, _at: Coord<f64>, style: &MarkerStyle) -> ShapeId {
        self.push(style.fill_colour)
    }

    fn restyle_polygon(&mut self, shape: ShapeId, style: &ShapeStyle) {
        self.restyle(shape, style.fill_colour);
    }

    fn restyle_marker(&mut self, shape: ShapeId, style: &MarkerStyle) {
        self.restyle(shape, style.fill_colour);
    }

    fn bind_popup(&mut self, shape: ShapeId, content: &str) {
        if let Some(drawn) = self.shapes.get_mut(shape.get()) {
            drawn.popup = Some(content.to_owned());
        }
    }
}

#[derive(Debug, Serialize)]
struct MapReport {
    sector: Sector,
    mode: &'static str,
    restyled: usize,
    shapes: Vec<ShapeReport>,
}

#[derive(Debug, Serialize)]
struct ShapeReport {
    name: String,
    kind: &'static str,
    tier: &'static str,
    colour: &'static str,
    popup: Option<String>,
}

const fn mode_name(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Uninitialized => "uninitialized",
        RenderMode::Boundary => "boundary",
        RenderMode::Marker => "marker",
    }
}

const fn kind_name(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Polygon => "polygon",
        ShapeKind::Marker => "marker",
    }
}

pub(crate) fn run_map(args: MapArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_map_with(args, &DefaultSourceBuilder, &mut stdout)
}

pub(crate) fn run_map_with(
    args: MapArgs,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = project(&config, builder)?;
    match config.format {
        OutputFormat::Json => write_json(writer, &report),
        OutputFormat::Text => write_report(writer, &report).map_err(CliError::Write),
    }
}

fn project(config: &MapConfig, builder: &dyn SourceBuilder) -> Result<MapReport, CliError> {
    let (datasets, boundaries) = load_datasets_and_boundaries(&config.data, builder)?;
    let mut navigator = Navigator::new(datasets, TextSurface::default());
    let mode = navigator.initialise_map(boundaries)?;
    let restyled = match navigator.dispatch(NavigatorEvent::SectorSelected(config.sector.clone()))? {
        Update::Sector { restyled, .. } => restyled,
        Update::Session { .. } | Update::Details(_) => 0,
    };

    let surface = navigator.surface();
    let shapes = navigator
        .projector()
        .shapes()
        .iter()
        .map(|rendered| {
            let drawn = surface.shape(rendered.shape);
            ShapeReport {
                name: rendered.name.clone(),
                kind: kind_name(rendered.kind),
                tier: rendered.tier.as_str(),
                colour: drawn.map_or_else(|| rendered.tier.colour(), |shape| shape.fill_colour),
                popup: drawn.and_then(|shape| shape.popup.clone()),
            }
        })
        .collect();
    Ok(MapReport {
        sector: config.sector.clone(),
        mode: mode_name(mode),
        restyled,
        shapes,
    })
}

fn write_report(writer: &mut dyn Write, report: &MapReport) -> std::io::Result<()> {
    writeln!(
        writer,
        "{} map ({} mode, {} shapes restyled)",
        report.sector.title(),
        report.mode,
        report.restyled
    )?;
    for shape in &report.shapes {
        writeln!(
            writer,
            "  {:<24} {:<8} {:<8} {}",
            shape.name, shape.kind, shape.tier, shape.colour
        )?;
    }
    Ok(())
}
