// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ordered scenario execution with per-scenario outcome records.
//!
//! Each scenario is a named setup step or assertion. Failures are contained
//! at scenario granularity: a failed fixture step gates its dependents into
//! `Skipped` instead of letting them report spurious failures, and the run
//! always completes.

use anyhow::bail;
use log::{info, warn};

use section_abi::SectionStatus;
use section_host::SectionError;

/// Terminal outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Scenario ran and its assertion held.
    Passed,
    /// Scenario ran and failed, with a human-readable reason.
    Failed(String),
    /// Scenario was not run because a fixture it depends on failed.
    Skipped,
}

/// Name plus outcome for one executed (or skipped) scenario.
#[derive(Debug, Clone)]
pub struct ScenarioRecord {
    /// Scenario name as declared by the suite.
    pub name: String,
    /// Terminal outcome.
    pub outcome: Outcome,
}

/// Per-run outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Scenarios that ran and passed.
    pub passed: usize,
    /// Scenarios that ran and failed.
    pub failed: usize,
    /// Scenarios skipped after a fixture failure.
    pub skipped: usize,
}

/// Executes an ordered list of named scenarios and records their outcomes.
#[derive(Debug, Default)]
pub struct Runner {
    records: Vec<ScenarioRecord>,
}

impl Runner {
    /// Creates an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a scenario expected to succeed, yielding its value to dependents.
    ///
    /// Returns `None` on failure so callers can gate dependent scenarios; the
    /// failure is recorded, not propagated.
    pub fn run<T>(
        &mut self,
        name: &str,
        f: impl FnOnce() -> anyhow::Result<T>,
    ) -> Option<T> {
        match f() {
            Ok(value) => {
                info!("scenario passed: {name}");
                self.record(name, Outcome::Passed);
                Some(value)
            }
            Err(err) => {
                warn!("scenario failed: {name}: {err:#}");
                self.record(name, Outcome::Failed(format!("{err:#}")));
                None
            }
        }
    }

    /// Runs a scenario expected to fail with exactly `expected`.
    ///
    /// An unexpected success, a different status code, or a non-status error
    /// all record an expected-failure mismatch.
    pub fn expect_status<T>(
        &mut self,
        name: &str,
        expected: SectionStatus,
        f: impl FnOnce() -> Result<T, SectionError>,
    ) {
        let outcome = match f() {
            Ok(_) => Outcome::Failed(format!("expected `{expected}`, operation succeeded")),
            Err(err) => match err.status() {
                Some(code) if code == expected => Outcome::Passed,
                Some(code) => Outcome::Failed(format!("expected `{expected}`, got `{code}`")),
                None => Outcome::Failed(format!("expected `{expected}`, got: {err}")),
            },
        };
        match &outcome {
            Outcome::Passed => info!("scenario passed: {name}"),
            Outcome::Failed(reason) => warn!("scenario failed: {name}: {reason}"),
            Outcome::Skipped => {}
        }
        self.record(name, outcome);
    }

    /// Records a dependent scenario as skipped after a fixture failure.
    pub fn skip(&mut self, name: &str) {
        info!("scenario skipped: {name}");
        self.record(name, Outcome::Skipped);
    }

    /// Outcome records in execution order.
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Outcome counts for the run so far.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for record in &self.records {
            match record.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Logs the final report and converts any failure into an error.
    pub fn finish(self) -> anyhow::Result<Summary> {
        let summary = self.summary();
        for record in &self.records {
            if let Outcome::Failed(reason) = &record.outcome {
                warn!("failed scenario: {}: {reason}", record.name);
            }
        }
        info!(
            "run complete: {} passed, {} failed, {} skipped",
            summary.passed, summary.failed, summary.skipped
        );
        if summary.failed > 0 {
            bail!(
                "{} of {} scenarios failed",
                summary.failed,
                self.records.len()
            );
        }
        Ok(summary)
    }

    fn record(&mut self, name: &str, outcome: Outcome) {
        self.records.push(ScenarioRecord {
            name: name.to_string(),
            outcome,
        });
    }
}
