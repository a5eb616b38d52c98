//! # mealmax-smoke
//!
//! Scripted smoke runner for the MealMax meal battle API.
//!
//! This crate provides:
//! - Configuration loading (YAML file plus environment overrides)
//! - The fixture data and the fixed, ordered step script built from it
//! - A `Transport` seam with a `reqwest`-backed implementation
//! - The fail-fast runner and its human-readable reporter
//! - Test doubles for exercising the runner without a live service

mod config;
mod fixtures;
mod marker;
mod report;
mod runner;
mod step;
pub mod testing;
mod transport;

pub use config::{
    BASE_URL_ENV, CONFIG_PATH_ENV, ConfigError, ConfigWarning, DEFAULT_CONFIG_FILE, SmokeConfig,
};
pub use fixtures::{Difficulty, FixtureSet, MealFixture};
pub use marker::{MarkerMismatch, SuccessMarker};
pub use report::Reporter;
pub use runner::{
    FailureCause, RunReport, SmokeRunner, StepOutcome, StepRecord, TerminationReason,
};
pub use step::{Method, RequestSpec, Step, StepKind, script};
pub use transport::{HttpTransport, Transport, TransportError};
