//! Fail-fast driver for the step script.
//!
//! Steps run strictly one after another. The first step whose response lacks
//! its success marker ends the run; nothing after it is sent.
//!
//! # Example
//!
//! ```ignore
//! use mealmax_smoke::{SmokeConfig, SmokeRunner};
//!
//! let config = SmokeConfig::with_base_url("http://localhost:5000/api");
//! let runner = SmokeRunner::http(config)?;
//! let report = runner.run(&mut std::io::stdout()).await?;
//!
//! std::process::exit(report.exit_code());
//! ```

use crate::config::{ConfigError, SmokeConfig};
use crate::marker::MarkerMismatch;
use crate::report::Reporter;
use crate::step::{Method, Step, script};
use crate::transport::{HttpTransport, Transport};
use std::io::{self, Write};
use tracing::{debug, error, info};

/// Why a step failed. The printed failure line is the same for all causes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FailureCause {
    /// No response body: connection refused, DNS failure, broken stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// A body arrived but did not carry the success marker.
    #[error(transparent)]
    Marker(#[from] MarkerMismatch),
}

/// Final state of a step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Success,
    Failed(FailureCause),
}

/// One executed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub name: &'static str,
    pub method: Method,
    pub path: String,
    pub outcome: StepOutcome,
}

/// Reason the run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// Every step passed.
    Completed,
    /// A step failed and the remaining steps were skipped.
    StepFailed {
        step: &'static str,
        cause: FailureCause,
    },
}

impl TerminationReason {
    /// Returns the process exit code for this termination reason.
    ///
    /// - 0: every step passed
    /// - 1: a step failed
    pub fn exit_code(&self) -> i32 {
        match self {
            TerminationReason::Completed => 0,
            TerminationReason::StepFailed { .. } => 1,
        }
    }
}

/// Result of a smoke run.
#[derive(Debug, Clone)]
pub struct RunReport {
    records: Vec<StepRecord>,
    termination_reason: TerminationReason,
}

impl RunReport {
    /// Returns true if every step passed.
    pub fn completed_successfully(&self) -> bool {
        self.termination_reason == TerminationReason::Completed
    }

    /// Returns the executed steps, in order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Returns the number of requests issued.
    pub fn calls(&self) -> usize {
        self.records.len()
    }

    /// Returns the termination reason.
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the name of the failed step, if any.
    pub fn failed_step(&self) -> Option<&'static str> {
        match &self.termination_reason {
            TerminationReason::Completed => None,
            TerminationReason::StepFailed { step, .. } => Some(*step),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.termination_reason.exit_code()
    }
}

/// The smoke runner.
pub struct SmokeRunner<T> {
    config: SmokeConfig,
    transport: T,
    steps: Vec<Step>,
    use_colors: bool,
}

impl SmokeRunner<HttpTransport> {
    /// Creates a runner that talks HTTP to `config.base_url`.
    pub fn http(config: SmokeConfig) -> Result<Self, ConfigError> {
        let base = config.parsed_base_url()?;
        Ok(Self::new(config, HttpTransport::new(base)))
    }
}

impl<T: Transport> SmokeRunner<T> {
    pub fn new(config: SmokeConfig, transport: T) -> Self {
        let steps = script(&config.fixtures);
        Self {
            config,
            transport,
            steps,
            use_colors: false,
        }
    }

    /// Enables ANSI colors in the progress output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Returns the steps this runner will execute, in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs every step, writing progress to `out`.
    ///
    /// Step failures are reported through the returned `RunReport`; only a
    /// failure to write progress is an `Err`.
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<RunReport> {
        let mut reporter = Reporter::new(out, self.use_colors);
        let mut records = Vec::with_capacity(self.steps.len());

        info!(
            base_url = %self.config.base_url,
            steps = self.steps.len(),
            echo_json = self.config.echo_json,
            "Starting smoke run"
        );

        for step in &self.steps {
            reporter.progress(&step.progress)?;
            reporter.flush()?;

            let result = match self.transport.send(&step.request).await {
                Ok(body) => step
                    .marker
                    .check(&body)
                    .map(|()| body)
                    .map_err(FailureCause::from),
                Err(e) => Err(FailureCause::Transport(e.to_string())),
            };

            let path = step.request.display_path();
            match result {
                Ok(body) => {
                    debug!(step = step.name, path = %path, "Step passed");
                    reporter.success(&step.success)?;
                    if self.config.echo_json {
                        if let Some(heading) = step.echo_heading() {
                            reporter.echo(heading, &body)?;
                        }
                    }
                    records.push(StepRecord {
                        name: step.name,
                        method: step.request.method,
                        path,
                        outcome: StepOutcome::Success,
                    });
                }
                Err(cause) => {
                    error!(
                        step = step.name,
                        method = %step.request.method,
                        path = %path,
                        marker = %step.marker,
                        cause = %cause,
                        "Step failed"
                    );
                    reporter.failure(&step.failure)?;
                    reporter.flush()?;
                    records.push(StepRecord {
                        name: step.name,
                        method: step.request.method,
                        path,
                        outcome: StepOutcome::Failed(cause.clone()),
                    });
                    return Ok(RunReport {
                        records,
                        termination_reason: TerminationReason::StepFailed {
                            step: step.name,
                            cause,
                        },
                    });
                }
            }
        }

        reporter.all_passed()?;
        reporter.flush()?;
        info!(calls = records.len(), "Smoke run completed");

        Ok(RunReport {
            records,
            termination_reason: TerminationReason::Completed,
        })
    }
}
