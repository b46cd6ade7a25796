//! The `gradix grade` command.

use std::path::PathBuf;

use anyhow::Result;

use gradix_core::grader::Grader;
use gradix_core::mission::{lint_mission, parse_mission};
use gradix_core::report::GradingReport;
use gradix_core::validator::ValidatorReport;

pub async fn execute(
    student_id: String,
    mission_path: PathBuf,
    submission_dir: Option<PathBuf>,
    output: PathBuf,
    format: String,
) -> Result<i32> {
    let mut config = parse_mission(&mission_path)?;

    if let Some(dir) = submission_dir {
        config.submission_dir = Some(dir.canonicalize().unwrap_or(dir));
    }

    for warning in lint_mission(&config) {
        tracing::warn!(validator = ?warning.validator, "{}", warning.message);
    }

    let mission_id = config.id.clone();
    eprintln!(
        "Grading {student_id} :: {} ({} validators, passing score {})",
        config.name,
        config.validators.len(),
        config.passing_score
    );

    let grader = Grader::new(
        &student_id,
        &mission_id,
        config,
        gradix_validators::builtin_registry(),
    );
    let report = grader.execute().await;

    print_summary(&report);

    // Save outputs
    let timestamp = report.created_at.format("%Y%m%dT%H%M%S");
    let stem = format!("{student_id}_{mission_id}_{timestamp}");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                gradix_report::json::save_json(&report, &path)?;
                eprintln!("JSON report: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("{stem}.md"));
                gradix_report::markdown::write_markdown(&report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    eprintln!(
        "\nResult: {} (score {:.2})",
        if report.overall_passed { "PASS" } else { "FAIL" },
        report.overall_score
    );

    Ok(i32::from(!report.overall_passed))
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Validator", "Weight", "Score", "Passed", "Detail"]);

    for outcome in &report.outcomes {
        let detail = match &outcome.report {
            ValidatorReport::Completed(checklist) => {
                format!("{} / {} checks", checklist.passed_checks, checklist.total_checks)
            }
            ValidatorReport::Failed { error, .. } => error.clone(),
        };
        table.add_row(vec![
            Cell::new(&outcome.validator),
            Cell::new(outcome.weight),
            Cell::new(format!("{:.2}", outcome.report.score())),
            Cell::new(if outcome.report.is_passed() { "yes" } else { "no" }),
            Cell::new(detail),
        ]);
    }

    eprintln!("\n{table}");
}
