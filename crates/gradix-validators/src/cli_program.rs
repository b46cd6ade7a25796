//! CLI program validator: runs the submitted program as a subprocess.
//!
//! Every invocation is bounded by a timeout owned by this validator; an
//! expired timeout surfaces as an error outcome on the check, never as a
//! hung grading run.

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use gradix_core::check::Check;
use gradix_core::checklist::Checklist;
use gradix_core::mission::MissionConfig;
use gradix_core::validator::Validator;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Output markers that indicate the program crashed instead of handling
/// bad input.
const CRASH_MARKERS: &[&str] = &["Traceback (most recent call last)", "panicked at"];

/// Runs the learner's program with fixed arguments.
#[derive(Clone)]
struct ProgramRunner {
    interpreter: Option<String>,
    program: PathBuf,
    work_dir: PathBuf,
    timeout: Duration,
}

impl ProgramRunner {
    async fn run(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(program = %self.program.display(), ?args, "running submitted program");
        let mut cmd = match &self.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // reap the child if the timeout cancels the future
            .kill_on_drop(true);

        tokio::time::timeout(self.timeout, cmd.output())
            .await
            .with_context(|| format!("program timed out after {}s", self.timeout.as_secs()))?
            .context("failed to run program")
    }
}

/// Validates that the submitted CLI program is present, responds to
/// `--help`, and handles bad input without crashing.
///
/// Settings: `program` (file name, required), `interpreter` (e.g.
/// "python3", optional), `timeout_secs` (default 10).
pub struct CliProgramValidator {
    config: Arc<MissionConfig>,
    checklist: Checklist,
    runner: Option<ProgramRunner>,
}

impl CliProgramValidator {
    pub fn new(config: Arc<MissionConfig>) -> Self {
        let checklist = Checklist::for_mission(&config);
        Self {
            config,
            checklist,
            runner: None,
        }
    }
}

#[async_trait]
impl Validator for CliProgramValidator {
    fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    async fn setup(&mut self) -> Result<()> {
        let work_dir = self
            .config
            .submission_dir
            .clone()
            .context("submission_dir is not configured")?;
        let program = self
            .config
            .setting_str("program")
            .context("settings.program is not configured")?;
        let timeout = Duration::from_secs(
            self.config
                .setting_u64("timeout_secs")
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        self.runner = Some(ProgramRunner {
            interpreter: self.config.setting_str("interpreter").map(str::to_string),
            program: work_dir.join(program),
            work_dir,
            timeout,
        });
        Ok(())
    }

    async fn build_checklist(&mut self) -> Result<()> {
        let runner = self.runner.clone().context("setup did not run")?;
        let program_name = runner
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string());

        let probe_runner = runner.clone();
        self.checklist.add(
            Check::new(
                "program_present",
                format!("{program_name} is present in the submission"),
                5,
                move || {
                    let path = probe_runner.program.clone();
                    async move { Ok(tokio::fs::try_exists(&path).await?) }
                },
            )
            .with_hint(format!("submit a file named {program_name}")),
        );

        let probe_runner = runner.clone();
        self.checklist.add(
            Check::new(
                "help_flag",
                "--help exits successfully",
                10,
                move || {
                    let runner = probe_runner.clone();
                    async move {
                        let output = runner.run(&["--help"]).await?;
                        Ok(output.status.success())
                    }
                },
            )
            .with_hint("support a --help option that prints usage and exits 0")
            .trap(),
        );

        let probe_runner = runner;
        self.checklist.add(
            Check::new(
                "graceful_errors",
                "an unknown subcommand does not crash the program",
                10,
                move || {
                    let runner = probe_runner.clone();
                    async move {
                        // a missing program cannot demonstrate graceful handling
                        if !tokio::fs::try_exists(&runner.program).await? {
                            return Ok(false);
                        }
                        let output = runner.run(&["definitely-not-a-subcommand"]).await?;
                        let combined = format!(
                            "{}\n{}",
                            String::from_utf8_lossy(&output.stdout),
                            String::from_utf8_lossy(&output.stderr)
                        );
                        Ok(!CRASH_MARKERS.iter().any(|m| combined.contains(m)))
                    }
                },
            )
            .with_hint("reject bad input with a message instead of a stack trace"),
        );

        Ok(())
    }

    async fn teardown(&mut self) -> Result<()> {
        self.runner = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_core::check::CheckStatus;
    use gradix_core::validator::{run_validator, ValidatorReport};

    fn mission(dir: &std::path::Path, program: &str) -> Arc<MissionConfig> {
        let mut settings = toml::value::Table::new();
        settings.insert("program".into(), toml::Value::String(program.into()));
        settings.insert("interpreter".into(), toml::Value::String("sh".into()));
        settings.insert("timeout_secs".into(), toml::Value::Integer(5));
        Arc::new(MissionConfig {
            id: "cli01".into(),
            name: "CLI mission".into(),
            description: String::new(),
            passing_score: 70,
            validators: vec![],
            submission_dir: Some(dir.to_path_buf()),
            settings,
        })
    }

    const WELL_BEHAVED: &str = r#"
case "$1" in
  --help) echo "usage: cli.sh [command]"; exit 0 ;;
  *) echo "unknown command: $1" >&2; exit 2 ;;
esac
"#;

    const CRASHY: &str = r#"
case "$1" in
  --help) echo "usage"; exit 0 ;;
  *) echo "Traceback (most recent call last):" >&2; exit 1 ;;
esac
"#;

    #[tokio::test]
    async fn well_behaved_program_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cli.sh"), WELL_BEHAVED).unwrap();

        let mut v = CliProgramValidator::new(mission(dir.path(), "cli.sh"));
        let report = run_validator(&mut v).await.unwrap();

        assert!(report.is_passed());
        assert_eq!(report.score(), 100.0);
    }

    #[tokio::test]
    async fn stack_trace_on_bad_input_fails_the_crash_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cli.sh"), CRASHY).unwrap();

        let mut v = CliProgramValidator::new(mission(dir.path(), "cli.sh"));
        let report = run_validator(&mut v).await.unwrap();

        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        let crash_check = report
            .checks
            .iter()
            .find(|c| c.id == "graceful_errors")
            .unwrap();
        assert_eq!(crash_check.status, CheckStatus::Failed);
    }

    #[tokio::test]
    async fn missing_program_fails_presence_and_errors_subprocess_checks() {
        let dir = tempfile::tempdir().unwrap();

        let mut v = CliProgramValidator::new(mission(dir.path(), "cli.sh"));
        let report = run_validator(&mut v).await.unwrap();

        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        let presence = report
            .checks
            .iter()
            .find(|c| c.id == "program_present")
            .unwrap();
        assert_eq!(presence.status, CheckStatus::Failed);
        // sh exits non-zero for a missing script, so --help fails rather
        // than errors, and the crash check refuses a missing program
        assert!(!report.is_passed);
        assert_eq!(report.earned_points, 0);
    }

    #[tokio::test]
    async fn missing_program_setting_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = (*mission(dir.path(), "cli.sh")).clone();
        config.settings.remove("program");

        let mut v = CliProgramValidator::new(Arc::new(config));
        let report = run_validator(&mut v).await.unwrap();

        assert!(!report.is_passed());
        assert!(report.error().unwrap().contains("settings.program"));
    }

    #[tokio::test]
    async fn hanging_program_times_out_as_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cli.sh"), "sleep 60\n").unwrap();

        let mut config = (*mission(dir.path(), "cli.sh")).clone();
        config
            .settings
            .insert("timeout_secs".into(), toml::Value::Integer(1));

        let mut v = CliProgramValidator::new(Arc::new(config));
        let report = run_validator(&mut v).await.unwrap();

        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        let help_check = report.checks.iter().find(|c| c.id == "help_flag").unwrap();
        assert_eq!(help_check.status, CheckStatus::Error);
        assert!(help_check
            .error_message
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }
}
