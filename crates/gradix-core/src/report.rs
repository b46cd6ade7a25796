//! The grading report: per-validator outcomes and the overall verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::round2;
use crate::validator::ValidatorReport;

/// One validator's contribution to the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorOutcome {
    /// Validator id as declared in the mission config.
    pub validator: String,
    /// Declared weight of this validator's score.
    pub weight: f64,
    pub report: ValidatorReport,
}

/// The complete result of one grading run.
///
/// `overall_passed` is a strict AND over every validator's pass flag while
/// `overall_score` is a weighted average of their scores; the two signals
/// can disagree, and that asymmetry is the documented contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    pub student_id: String,
    pub mission_id: String,
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Outcomes in declaration order.
    pub outcomes: Vec<ValidatorOutcome>,
    pub overall_passed: bool,
    pub overall_score: f64,
}

impl GradingReport {
    pub fn new(student_id: impl Into<String>, mission_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            mission_id: mission_id.into(),
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            outcomes: Vec::new(),
            overall_passed: false,
            overall_score: 0.0,
        }
    }

    /// Append one validator's outcome. Call order is report order.
    pub fn add_outcome(&mut self, validator: impl Into<String>, weight: f64, report: ValidatorReport) {
        self.outcomes.push(ValidatorOutcome {
            validator: validator.into(),
            weight,
            report,
        });
    }

    /// Compute the overall verdict and score. Call once, after every
    /// validator has been recorded.
    ///
    /// Weighted average when the declared weights sum to something
    /// positive, arithmetic mean otherwise. Zero validators is a defined
    /// edge case: fail with score 0.
    pub fn finalize(&mut self) {
        if self.outcomes.is_empty() {
            self.overall_passed = false;
            self.overall_score = 0.0;
            return;
        }

        self.overall_passed = self.outcomes.iter().all(|o| o.report.is_passed());

        let total_weight: f64 = self.outcomes.iter().map(|o| o.weight).sum();
        let score = if total_weight > 0.0 {
            self.outcomes
                .iter()
                .map(|o| o.report.score() * o.weight)
                .sum::<f64>()
                / total_weight
        } else {
            self.outcomes.iter().map(|o| o.report.score()).sum::<f64>()
                / self.outcomes.len() as f64
        };
        self.overall_score = round2(score);
    }
}
