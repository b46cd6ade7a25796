//! Grading run orchestration.
//!
//! Resolves each declared validator, runs it through its lifecycle, and
//! collects outcomes into one [`GradingReport`]. Validators run strictly
//! one after another: they commonly spawn external processes and share a
//! working directory, and the engine does not own the isolation that
//! parallel execution would require.

use std::sync::Arc;

use crate::mission::MissionConfig;
use crate::registry::ValidatorRegistry;
use crate::report::GradingReport;
use crate::validator::{run_validator, ValidatorReport};

/// One grading run: a learner, a mission, and the validators it declares.
pub struct Grader {
    student_id: String,
    mission_id: String,
    config: Arc<MissionConfig>,
    registry: ValidatorRegistry,
}

impl Grader {
    pub fn new(
        student_id: impl Into<String>,
        mission_id: impl Into<String>,
        config: MissionConfig,
        registry: ValidatorRegistry,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            mission_id: mission_id.into(),
            config: Arc::new(config),
            registry,
        }
    }

    /// Run every declared validator and produce the finalized report.
    ///
    /// A run always completes: resolution failures and any error escaping a
    /// validator's own containment (teardown failures included) degrade to
    /// a weight-preserving failed outcome instead of aborting the run.
    pub async fn execute(&self) -> GradingReport {
        let mut report = GradingReport::new(&self.student_id, &self.mission_id);

        for decl in &self.config.validators {
            tracing::info!(validator = %decl.name, weight = decl.weight, "running validator");

            let outcome = match self.registry.resolve(&decl.name, Arc::clone(&self.config)) {
                Ok(mut validator) => match run_validator(validator.as_mut()).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(validator = %decl.name, error = %format!("{e:#}"), "validator run failed");
                        ValidatorReport::Failed {
                            name: self.config.name.clone(),
                            description: self.config.description.clone(),
                            error: format!("{e:#}"),
                        }
                    }
                },
                Err(e) => {
                    tracing::error!(validator = %decl.name, error = %e, "validator resolution failed");
                    ValidatorReport::Failed {
                        name: self.config.name.clone(),
                        description: self.config.description.clone(),
                        error: e.to_string(),
                    }
                }
            };

            report.add_outcome(decl.name.clone(), decl.weight, outcome);
        }

        report.finalize();
        report
    }
}
