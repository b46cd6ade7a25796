//! The validator lifecycle contract.
//!
//! Concrete validators implement [`Validator`]; the fixed orchestration and
//! failure containment live in [`run_validator`] so no plugin has to get
//! them right on its own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::checklist::{Checklist, ChecklistReport};

/// A pluggable unit that produces and executes one checklist against a
/// submission.
///
/// Lifecycle, driven by [`run_validator`]: `setup` prepares fixtures the
/// checks will probe, `build_checklist` appends checks to the owned
/// checklist, then the checklist executes. `teardown` runs on every exit
/// path and is expected not to fail; if it does, the error propagates to
/// the grader.
#[async_trait]
pub trait Validator: Send {
    fn checklist(&self) -> &Checklist;

    fn checklist_mut(&mut self) -> &mut Checklist;

    /// Prepare anything the checks will probe. May run external programs
    /// or write temp files.
    async fn setup(&mut self) -> Result<()>;

    /// Populate the owned checklist.
    async fn build_checklist(&mut self) -> Result<()>;

    /// Release whatever `setup` acquired. Invoked unconditionally.
    async fn teardown(&mut self) -> Result<()>;
}

/// Outcome of running one validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidatorReport {
    /// The checklist was built and executed; scoring details inside.
    Completed(ChecklistReport),
    /// `setup` or `build_checklist` failed before any checks ran. No
    /// partial checklist output exists.
    Failed {
        name: String,
        description: String,
        error: String,
    },
}

impl ValidatorReport {
    pub fn is_passed(&self) -> bool {
        match self {
            ValidatorReport::Completed(report) => report.is_passed,
            ValidatorReport::Failed { .. } => false,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            ValidatorReport::Completed(report) => report.score,
            ValidatorReport::Failed { .. } => 0.0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ValidatorReport::Completed(_) => None,
            ValidatorReport::Failed { error, .. } => Some(error),
        }
    }
}

/// Run one validator through its full lifecycle.
///
/// A failure in `setup` or `build_checklist` degrades the outcome to
/// [`ValidatorReport::Failed`] with score 0; the checklist is not executed.
/// `teardown` runs in every case, and a teardown failure is returned as
/// `Err` — cleanup failure is an environment problem outside the scoring
/// contract, and the caller decides what to do with it.
pub async fn run_validator(validator: &mut dyn Validator) -> Result<ValidatorReport> {
    let built = match validator.setup().await.context("setup failed") {
        Ok(()) => validator
            .build_checklist()
            .await
            .context("build_checklist failed"),
        Err(e) => Err(e),
    };

    let report = match built {
        Ok(()) => ValidatorReport::Completed(validator.checklist_mut().execute_all().await),
        Err(e) => {
            let checklist = validator.checklist();
            tracing::warn!(validator = %checklist.name, error = %format!("{e:#}"), "validator degraded");
            ValidatorReport::Failed {
                name: checklist.name.clone(),
                description: checklist.description.clone(),
                error: format!("{e:#}"),
            }
        }
    };

    validator.teardown().await.context("teardown failed")?;
    Ok(report)
}
