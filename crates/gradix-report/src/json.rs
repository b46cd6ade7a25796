//! JSON persistence for grading reports.

use std::path::Path;

use anyhow::{Context, Result};

use gradix_core::report::GradingReport;

/// Save a report as pretty-printed JSON, creating parent directories.
pub fn save_json(report: &GradingReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// Load a report from a JSON file.
pub fn load_json(path: &Path) -> Result<GradingReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    let report: GradingReport =
        serde_json::from_str(&content).context("failed to parse report JSON")?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_core::check::{CheckRow, CheckStatus};
    use gradix_core::checklist::ChecklistReport;
    use gradix_core::validator::ValidatorReport;

    fn sample_report() -> GradingReport {
        let mut report = GradingReport::new("student-7", "linux-level1-mission01");
        report.add_outcome(
            "ssh_config",
            2.0,
            ValidatorReport::Completed(ChecklistReport {
                name: "SSH hardening".into(),
                description: "port + root login".into(),
                total_checks: 2,
                passed_checks: 1,
                total_points: 30,
                earned_points: 15,
                score: 50.0,
                passing_score: 70,
                is_passed: false,
                checks: vec![
                    CheckRow {
                        id: "ssh_port".into(),
                        description: "SSH listens on port 20022".into(),
                        points: 15,
                        status: CheckStatus::Passed,
                        error_message: None,
                        duration_ms: 3,
                        notable_trap: true,
                        hint: None,
                    },
                    CheckRow {
                        id: "ssh_root_login_no".into(),
                        description: "PermitRootLogin is set to no".into(),
                        points: 15,
                        status: CheckStatus::Failed,
                        error_message: None,
                        duration_ms: 2,
                        notable_trap: true,
                        hint: Some("set 'PermitRootLogin no'".into()),
                    },
                ],
            }),
        );
        report.add_outcome(
            "cli_program",
            1.0,
            ValidatorReport::Failed {
                name: "SSH hardening".into(),
                description: "port + root login".into(),
                error: "setup failed: submission_dir is not configured".into(),
            },
        );
        report.finalize();
        report
    }

    #[test]
    fn roundtrip_preserves_per_check_breakdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        let report = sample_report();
        save_json(&report, &path).unwrap();
        let loaded = load_json(&path).unwrap();

        assert_eq!(loaded.student_id, "student-7");
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.outcomes.len(), 2);

        let ValidatorReport::Completed(checklist) = &loaded.outcomes[0].report else {
            panic!("first outcome should be a completed checklist");
        };
        assert_eq!(checklist.checks.len(), 2);
        assert_eq!(checklist.checks[1].status, CheckStatus::Failed);
        assert_eq!(
            checklist.checks[1].hint.as_deref(),
            Some("set 'PermitRootLogin no'")
        );
        assert_eq!(
            loaded.outcomes[1].report.error(),
            Some("setup failed: submission_dir is not configured")
        );
    }

    #[test]
    fn load_missing_file_errors_with_path() {
        let err = load_json(Path::new("no/such/report.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/report.json"));
    }
}
