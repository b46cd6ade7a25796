//! Submission layout validator: required files exist and are non-empty.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use gradix_core::check::Check;
use gradix_core::checklist::Checklist;
use gradix_core::mission::MissionConfig;
use gradix_core::validator::Validator;

/// Checks that every file in `settings.required_files` is present and
/// non-empty under the submission directory.
pub struct SubmissionLayoutValidator {
    config: Arc<MissionConfig>,
    checklist: Checklist,
    submission_dir: Option<PathBuf>,
}

impl SubmissionLayoutValidator {
    pub fn new(config: Arc<MissionConfig>) -> Self {
        let checklist = Checklist::for_mission(&config);
        Self {
            config,
            checklist,
            submission_dir: None,
        }
    }
}

#[async_trait]
impl Validator for SubmissionLayoutValidator {
    fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    async fn setup(&mut self) -> Result<()> {
        let dir = self
            .config
            .submission_dir
            .clone()
            .context("submission_dir is not configured")?;
        anyhow::ensure!(
            tokio::fs::try_exists(&dir).await?,
            "submission directory does not exist: {}",
            dir.display()
        );
        self.submission_dir = Some(dir);
        Ok(())
    }

    async fn build_checklist(&mut self) -> Result<()> {
        let dir = self
            .submission_dir
            .clone()
            .context("setup did not run")?;
        let required = self.config.setting_strings("required_files");
        anyhow::ensure!(
            !required.is_empty(),
            "settings.required_files is empty; nothing to check"
        );

        for file in required {
            let slug = file.replace(['.', '/', '\\'], "_");
            let path = dir.join(&file);

            let probe_path = path.clone();
            self.checklist.add(
                Check::new(
                    format!("present_{slug}"),
                    format!("{file} is present in the submission"),
                    5,
                    move || {
                        let path = probe_path.clone();
                        async move { Ok(tokio::fs::try_exists(&path).await?) }
                    },
                )
                .with_hint(format!("submit a file named {file}")),
            );

            let probe_path = path.clone();
            self.checklist.add(
                Check::new(
                    format!("non_empty_{slug}"),
                    format!("{file} is not empty"),
                    5,
                    move || {
                        let path = probe_path.clone();
                        async move {
                            match tokio::fs::metadata(&path).await {
                                Ok(meta) => Ok(meta.len() > 0),
                                Err(_) => Ok(false),
                            }
                        }
                    },
                )
                .with_hint(format!("{file} must contain actual work, not be a placeholder")),
            );
        }
        Ok(())
    }

    async fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}
