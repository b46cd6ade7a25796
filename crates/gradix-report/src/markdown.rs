//! Markdown rendering of a grading report.
//!
//! Walks validators in declaration order and checks in insertion order,
//! annotating non-passing checks with their error message and hint.

use std::path::Path;

use anyhow::{Context, Result};

use gradix_core::check::CheckStatus;
use gradix_core::report::GradingReport;
use gradix_core::validator::ValidatorReport;

/// Render the full human-readable report.
pub fn render(report: &GradingReport) -> String {
    let mut md = String::new();

    md.push_str("# Grading report\n\n");
    md.push_str(&format!("- **Student**: {}\n", report.student_id));
    md.push_str(&format!("- **Mission**: {}\n", report.mission_id));
    md.push_str(&format!(
        "- **Graded at**: {}\n",
        report.created_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Verdict**: {}\n",
        if report.overall_passed { "PASS" } else { "FAIL" }
    ));
    md.push_str(&format!("- **Overall score**: {:.2}\n\n", report.overall_score));
    md.push_str("---\n\n");

    for (idx, outcome) in report.outcomes.iter().enumerate() {
        md.push_str(&format!(
            "## {}. {} (weight {})\n\n",
            idx + 1,
            outcome.validator,
            outcome.weight
        ));

        match &outcome.report {
            ValidatorReport::Completed(checklist) => {
                md.push_str(&format!(
                    "- **Result**: {}\n",
                    if checklist.is_passed { "passed" } else { "failed" }
                ));
                md.push_str(&format!(
                    "- **Score**: {:.2} ({} / {} points)\n",
                    checklist.score, checklist.earned_points, checklist.total_points
                ));
                md.push_str(&format!(
                    "- **Checks**: {} / {} passed\n\n",
                    checklist.passed_checks, checklist.total_checks
                ));

                for check in &checklist.checks {
                    let marker = match check.status {
                        CheckStatus::Passed => "x",
                        _ => " ",
                    };
                    md.push_str(&format!(
                        "- [{marker}] **({} pts)** {}\n",
                        check.points, check.description
                    ));
                    if let Some(error) = &check.error_message {
                        md.push_str(&format!("    - error: `{error}`\n"));
                    }
                    if check.status != CheckStatus::Passed {
                        if let Some(hint) = &check.hint {
                            md.push_str(&format!("    - hint: {hint}\n"));
                        }
                    }
                }
            }
            ValidatorReport::Failed { error, .. } => {
                md.push_str("- **Result**: failed\n");
                md.push_str("- **Score**: 0.00\n");
                md.push_str(&format!("- **Error**: `{error}`\n"));
            }
        }

        md.push_str("\n---\n\n");
    }

    md
}

/// Write the Markdown report to a file, creating parent directories.
pub fn write_markdown(report: &GradingReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render(report))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_core::check::CheckRow;
    use gradix_core::checklist::ChecklistReport;

    fn check_row(id: &str, status: CheckStatus, hint: Option<&str>) -> CheckRow {
        CheckRow {
            id: id.into(),
            description: format!("{id} description"),
            points: 10,
            status,
            error_message: if status == CheckStatus::Error {
                Some("probe exploded".into())
            } else {
                None
            },
            duration_ms: 1,
            notable_trap: false,
            hint: hint.map(Into::into),
        }
    }

    fn sample_report() -> GradingReport {
        let mut report = GradingReport::new("s1", "m1");
        report.add_outcome(
            "layout",
            1.0,
            ValidatorReport::Completed(ChecklistReport {
                name: "Mission".into(),
                description: String::new(),
                total_checks: 3,
                passed_checks: 1,
                total_points: 30,
                earned_points: 10,
                score: 33.33,
                passing_score: 70,
                is_passed: false,
                checks: vec![
                    check_row("good", CheckStatus::Passed, None),
                    check_row("bad", CheckStatus::Failed, Some("try harder")),
                    check_row("ugly", CheckStatus::Error, None),
                ],
            }),
        );
        report.add_outcome(
            "broken",
            2.0,
            ValidatorReport::Failed {
                name: "Mission".into(),
                description: String::new(),
                error: "setup failed".into(),
            },
        );
        report.finalize();
        report
    }

    #[test]
    fn renders_header_and_verdict() {
        let md = render(&sample_report());
        assert!(md.contains("- **Student**: s1"));
        assert!(md.contains("- **Verdict**: FAIL"));
        assert!(md.contains("## 1. layout (weight 1)"));
        assert!(md.contains("## 2. broken (weight 2)"));
    }

    #[test]
    fn failed_checks_show_hint_and_error() {
        let md = render(&sample_report());
        assert!(md.contains("- [x] **(10 pts)** good description"));
        assert!(md.contains("- [ ] **(10 pts)** bad description"));
        assert!(md.contains("hint: try harder"));
        assert!(md.contains("error: `probe exploded`"));
    }

    #[test]
    fn degraded_validator_shows_its_error() {
        let md = render(&sample_report());
        assert!(md.contains("- **Error**: `setup failed`"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.md");
        write_markdown(&sample_report(), &path).unwrap();
        assert!(path.exists());
    }
}
