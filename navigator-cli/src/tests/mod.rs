//! Shared test harness modules for the navigator CLI.

use super::*;

mod helpers;
mod steps;
