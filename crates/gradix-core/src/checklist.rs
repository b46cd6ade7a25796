//! Ordered check collections and weighted scoring.

use serde::{Deserialize, Serialize};

use crate::check::{Check, CheckRow};
use crate::mission::MissionConfig;

/// Round to two decimals, matching the precision reports are stored with.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An ordered collection of checks owned by one validator.
///
/// Insertion order is preserved; it determines report order but has no
/// effect on scoring.
#[derive(Debug)]
pub struct Checklist {
    pub name: String,
    pub description: String,
    /// Score (0–100) required to pass.
    pub passing_score: u32,
    checks: Vec<Check>,
}

impl Checklist {
    pub fn new(name: impl Into<String>, description: impl Into<String>, passing_score: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            passing_score,
            checks: Vec::new(),
        }
    }

    /// Checklist carrying the mission's identity and pass threshold, the
    /// shape every validator starts from.
    pub fn for_mission(config: &MissionConfig) -> Self {
        Self::new(&config.name, &config.description, config.passing_score)
    }

    /// Append a check. Checks run in insertion order.
    pub fn add(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Sum of all check weights.
    pub fn total_points(&self) -> u32 {
        self.checks.iter().map(|c| c.points).sum()
    }

    /// Run every check once, in order, and compute the aggregate score.
    ///
    /// A checklist with no scoreable points, whether empty or holding only
    /// zero-weight checks, scores 0 and never passes, regardless of the
    /// passing threshold.
    pub async fn execute_all(&mut self) -> ChecklistReport {
        let mut rows = Vec::with_capacity(self.checks.len());
        let mut passed_checks = 0usize;
        let mut total_points = 0u32;
        let mut earned_points = 0u32;

        for check in &mut self.checks {
            let passed = check.execute().await;
            tracing::debug!(
                check = %check.id,
                status = %check.status(),
                duration_ms = check.duration_ms(),
                "check finished"
            );

            total_points += check.points;
            if passed {
                passed_checks += 1;
                earned_points += check.points;
            }
            rows.push(check.row());
        }

        let score = if total_points > 0 {
            round2(f64::from(earned_points) / f64::from(total_points) * 100.0)
        } else {
            0.0
        };
        let is_passed = total_points > 0 && score >= f64::from(self.passing_score);

        ChecklistReport {
            name: self.name.clone(),
            description: self.description.clone(),
            total_checks: self.checks.len(),
            passed_checks,
            total_points,
            earned_points,
            score,
            passing_score: self.passing_score,
            is_passed,
            checks: rows,
        }
    }
}

/// Aggregate result of executing one checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistReport {
    pub name: String,
    pub description: String,
    pub total_checks: usize,
    pub passed_checks: usize,
    pub total_points: u32,
    pub earned_points: u32,
    /// Percentage score rounded to two decimals.
    pub score: f64,
    pub passing_score: u32,
    pub is_passed: bool,
    pub checks: Vec<CheckRow>,
}
