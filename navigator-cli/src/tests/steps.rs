//! Behaviour-driven step definitions driving the navigator CLI scenarios.

use super::helpers::{SampleDataDir, execute};
use super::*;
use crate::data::DefaultSourceBuilder;
use navigator_data::{DatasetPaths, LoadError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct NavigatorWorld {
    data: SampleDataDir,
    paths: DatasetPaths,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<String>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl NavigatorWorld {
    fn new() -> Self {
        Self {
            data: SampleDataDir::new(),
            paths: DatasetPaths::default(),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(String::new()),
            result: RefCell::new(None),
        }
    }

    fn request(&self, args: &[&str]) {
        let mut argv = vec!["navigator".to_owned()];
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        argv.extend([
            format!("--{ARG_DATA_DIR}"),
            self.data.root().as_str().to_owned(),
        ]);
        self.cli_args.replace(argv);
    }

    fn remove(&self, location: &str) {
        std::fs::remove_file(self.data.root().join(location).as_std_path())
            .expect("remove dataset file");
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> NavigatorWorld {
    NavigatorWorld::new()
}

#[given("the sample datasets are written to a data directory")]
fn sample_datasets_written(#[from(world)] world: &NavigatorWorld) {
    assert!(world.data.root().join(&world.paths.metrics).is_file());
}

#[given("the boundary file is removed")]
fn boundary_file_removed(#[from(world)] world: &NavigatorWorld) {
    world.remove(&world.paths.boundaries);
}

#[given("the metrics file is removed")]
fn metrics_file_removed(#[from(world)] world: &NavigatorWorld) {
    world.remove(&world.paths.metrics);
}

#[given("I request the tourism ranking")]
fn request_tourism_ranking(#[from(world)] world: &NavigatorWorld) {
    world.request(&["rank", "--sector", "tourism"]);
}

#[given("I request a ranking without a sector")]
fn request_ranking_without_sector(#[from(world)] world: &NavigatorWorld) {
    world.request(&["rank"]);
}

#[given("I request the tourism map")]
fn request_tourism_map(#[from(world)] world: &NavigatorWorld) {
    world.request(&["map", "--sector", "tourism"]);
}

#[when("I run the navigator")]
fn run_navigator(#[from(world)] world: &NavigatorWorld) {
    let invocation = world.cli_args.borrow().clone();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let (result, output) = execute(cli.command, &DefaultSourceBuilder);
        world.stdout.replace(output);
        result
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &NavigatorWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err}");
    }
}

#[then("Sousse is recommended first")]
fn sousse_first(#[from(world)] world: &NavigatorWorld) {
    let stdout = world.stdout.borrow();
    let first = stdout.lines().nth(1).expect("a recommendation line");
    assert_eq!(first, "1. Sousse (88/100)");
}

#[then("the map is drawn with markers")]
fn map_drawn_with_markers(#[from(world)] world: &NavigatorWorld) {
    let stdout = world.stdout.borrow();
    assert!(stdout.starts_with("Tourism map (marker mode"));
    assert_eq!(stdout.lines().filter(|line| line.starts_with("  ")).count(), 3);
}

#[then("the command fails because the sector is missing")]
fn fails_missing_sector(#[from(world)] world: &NavigatorWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_SECTOR);
            assert_eq!(*env, ENV_RANK_SECTOR);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails to load the metrics")]
fn fails_to_load_metrics(#[from(world)] world: &NavigatorWorld) {
    match &*world.error() {
        CliError::Load(err @ LoadError::Transport { .. }) => {
            assert_eq!(err.resource(), world.paths.metrics);
        }
        other => panic!("expected a transport failure, found {other:?}"),
    }
}

macro_rules! register_navigator_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/navigator_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: NavigatorWorld) {
            let _ = world;
        }
    };
}

register_navigator_scenario!(rank_from_directory, "ranking a sector from a data directory");
register_navigator_scenario!(rank_without_sector, "rejecting a ranking without a sector");
register_navigator_scenario!(
    map_marker_fallback,
    "drawing markers when the boundary file is absent"
);
register_navigator_scenario!(
    rank_missing_metrics,
    "failing when a required dataset is absent"
);
