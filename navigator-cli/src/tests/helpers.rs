//! Test helpers: stub dataset sources and output capture.

use super::*;
use crate::data::{DataConfig, SourceBuilder};
use camino::{Utf8Path, Utf8PathBuf};
use navigator_data::DatasetSource;
use navigator_data::test_support::{
    SAMPLE_BOUNDARIES_GEOJSON, SAMPLE_GOVERNORATES_JSON, SAMPLE_INDICATORS_CSV,
    SAMPLE_METRICS_JSON, SAMPLE_SECTORS_JSON, StubResponse, sample_source,
};
use std::fs;
use tempfile::TempDir;

/// Serves the sample datasets, with optional per-location overrides.
#[derive(Debug, Clone, Default)]
pub(super) struct StubSourceBuilder {
    overrides: Vec<(String, StubResponse)>,
}

impl StubSourceBuilder {
    pub(super) fn with_response(mut self, location: &str, response: StubResponse) -> Self {
        self.overrides.push((location.to_owned(), response));
        self
    }
}

impl SourceBuilder for StubSourceBuilder {
    fn build(&self, _config: &DataConfig) -> Result<Box<dyn DatasetSource>, CliError> {
        let source = self
            .overrides
            .iter()
            .fold(sample_source(), |source, (location, response)| {
                source.with_response(location, response.clone())
            });
        Ok(Box::new(source))
    }
}

/// Parse `argv` (without the binary name) into a command.
pub(super) fn parse(argv: &[&str]) -> Command {
    let mut full = vec!["navigator"];
    full.extend_from_slice(argv);
    Cli::try_parse_from(full).expect("arguments parse").command
}

/// Run `command` against `builder`, returning the result and captured stdout.
pub(super) fn execute(command: Command, builder: &dyn SourceBuilder) -> (Result<(), CliError>, String) {
    let mut stdout = Vec::new();
    let result = match command {
        Command::Rank(args) => rank::run_rank_with(args, builder, &mut stdout),
        Command::Map(args) => map::run_map_with(args, builder, &mut stdout),
        Command::Details(args) => details::run_details_with(args, builder, &mut stdout),
        Command::Highlights(args) => highlights::run_highlights_with(args, builder, &mut stdout),
    };
    let output = String::from_utf8(stdout).expect("stdout utf-8");
    (result, output)
}

/// A temporary directory holding the sample files under `data/`.
#[derive(Debug)]
pub(super) struct SampleDataDir {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl SampleDataDir {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 tempdir");
        let paths = navigator_data::DatasetPaths::default();
        for (location, contents) in [
            (&paths.indicators, SAMPLE_INDICATORS_CSV),
            (&paths.governorates, SAMPLE_GOVERNORATES_JSON),
            (&paths.sectors, SAMPLE_SECTORS_JSON),
            (&paths.metrics, SAMPLE_METRICS_JSON),
            (&paths.boundaries, SAMPLE_BOUNDARIES_GEOJSON),
        ] {
            write_utf8(&root.join(location), contents.as_bytes());
        }
        Self { _tmp: tmp, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.as_std_path()).expect("create parent directories");
    }
    fs::write(path.as_std_path(), contents).expect("write fixture");
}
