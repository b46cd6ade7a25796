//! SSH daemon configuration validator.
//!
//! Scans an sshd_config-style file for the hardening settings the mission
//! requires: a non-default port and root login fully disabled. Both checks
//! are classic traps — a commented-out `Port` line does not count, and
//! `PermitRootLogin prohibit-password` is not `no`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use gradix_core::check::Check;
use gradix_core::checklist::Checklist;
use gradix_core::mission::MissionConfig;
use gradix_core::validator::Validator;

const DEFAULT_SSHD_CONFIG: &str = "/etc/ssh/sshd_config";
const DEFAULT_SSH_PORT: u64 = 20022;

/// First value of `key` among active (non-comment) directives.
///
/// sshd uses first-match-wins semantics and case-insensitive keywords.
pub fn first_directive<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        if let Some(name) = parts.next() {
            if name.eq_ignore_ascii_case(key) {
                return parts.next();
            }
        }
    }
    None
}

/// Validates sshd hardening settings against the mission's expectations.
///
/// Settings: `sshd_config` (path, default `/etc/ssh/sshd_config`) and
/// `ssh_port` (default 20022).
pub struct SshConfigValidator {
    config: Arc<MissionConfig>,
    checklist: Checklist,
    sshd_config: PathBuf,
    expected_port: u64,
}

impl SshConfigValidator {
    pub fn new(config: Arc<MissionConfig>) -> Self {
        let checklist = Checklist::for_mission(&config);
        Self {
            config,
            checklist,
            sshd_config: PathBuf::from(DEFAULT_SSHD_CONFIG),
            expected_port: DEFAULT_SSH_PORT,
        }
    }
}

#[async_trait]
impl Validator for SshConfigValidator {
    fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    async fn setup(&mut self) -> Result<()> {
        if let Some(path) = self.config.setting_str("sshd_config") {
            self.sshd_config = PathBuf::from(path);
        }
        if let Some(port) = self.config.setting_u64("ssh_port") {
            self.expected_port = port;
        }
        Ok(())
    }

    async fn build_checklist(&mut self) -> Result<()> {
        let path = self.sshd_config.clone();
        let expected = self.expected_port.to_string();
        self.checklist.add(
            Check::new(
                "ssh_port",
                format!("SSH listens on port {}", self.expected_port),
                15,
                move || {
                    let path = path.clone();
                    let expected = expected.clone();
                    async move {
                        let content = tokio::fs::read_to_string(&path)
                            .await
                            .with_context(|| format!("failed to read {}", path.display()))?;
                        Ok(first_directive(&content, "Port") == Some(expected.as_str()))
                    }
                },
            )
            .with_hint(format!(
                "set 'Port {}' in sshd_config; a commented-out line does not count",
                self.expected_port
            ))
            .trap(),
        );

        let path = self.sshd_config.clone();
        self.checklist.add(
            Check::new(
                "ssh_root_login_no",
                "PermitRootLogin is set to no",
                15,
                move || {
                    let path = path.clone();
                    async move {
                        let content = tokio::fs::read_to_string(&path)
                            .await
                            .with_context(|| format!("failed to read {}", path.display()))?;
                        Ok(first_directive(&content, "PermitRootLogin") == Some("no"))
                    }
                },
            )
            .with_hint("set 'PermitRootLogin no'; 'prohibit-password' still allows key-based root login")
            .trap(),
        );

        Ok(())
    }

    async fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradix_core::check::CheckStatus;
    use gradix_core::validator::{run_validator, ValidatorReport};

    #[test]
    fn first_directive_skips_comments_and_blanks() {
        let content = "\n# Port 22\n  # PermitRootLogin yes\nPort 20022\nPermitRootLogin no\n";
        assert_eq!(first_directive(content, "Port"), Some("20022"));
        assert_eq!(first_directive(content, "PermitRootLogin"), Some("no"));
    }

    #[test]
    fn first_directive_is_case_insensitive_and_first_wins() {
        let content = "port 1234\nPort 5678\n";
        assert_eq!(first_directive(content, "Port"), Some("1234"));
        assert_eq!(first_directive(content, "permitrootlogin"), None);
    }

    #[test]
    fn first_directive_handles_missing_value() {
        assert_eq!(first_directive("Port\n", "Port"), None);
    }

    fn mission(sshd_config: &std::path::Path) -> Arc<MissionConfig> {
        let mut settings = toml::value::Table::new();
        settings.insert(
            "sshd_config".into(),
            toml::Value::String(sshd_config.display().to_string()),
        );
        Arc::new(MissionConfig {
            id: "ssh01".into(),
            name: "SSH hardening".into(),
            description: String::new(),
            passing_score: 100,
            validators: vec![],
            submission_dir: None,
            settings,
        })
    }

    async fn grade_fixture(content: &str) -> ValidatorReport {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sshd_config");
        std::fs::write(&path, content).unwrap();

        let mut v = SshConfigValidator::new(mission(&path));
        run_validator(&mut v).await.unwrap()
    }

    #[tokio::test]
    async fn hardened_config_passes() {
        let report = grade_fixture("Port 20022\nPermitRootLogin no\n").await;
        assert!(report.is_passed());
        assert_eq!(report.score(), 100.0);
    }

    #[tokio::test]
    async fn prohibit_password_is_not_accepted() {
        let report = grade_fixture("Port 20022\nPermitRootLogin prohibit-password\n").await;
        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        let root_check = report
            .checks
            .iter()
            .find(|c| c.id == "ssh_root_login_no")
            .unwrap();
        assert_eq!(root_check.status, CheckStatus::Failed);
        assert!(root_check.hint.as_deref().unwrap().contains("prohibit-password"));
        assert!(!report.is_passed);
    }

    #[tokio::test]
    async fn commented_port_line_does_not_count() {
        let report = grade_fixture("# Port 20022\nPermitRootLogin no\n").await;
        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        let port_check = report.checks.iter().find(|c| c.id == "ssh_port").unwrap();
        assert_eq!(port_check.status, CheckStatus::Failed);
    }

    #[tokio::test]
    async fn unreadable_config_yields_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist");

        let mut v = SshConfigValidator::new(mission(&path));
        let report = run_validator(&mut v).await.unwrap();

        let ValidatorReport::Completed(report) = report else {
            panic!("expected a completed report");
        };
        assert!(report
            .checks
            .iter()
            .all(|c| c.status == CheckStatus::Error));
        assert!(report.checks[0]
            .error_message
            .as_deref()
            .unwrap()
            .contains("failed to read"));
    }

    #[tokio::test]
    async fn custom_port_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sshd_config");
        std::fs::write(&path, "Port 2222\nPermitRootLogin no\n").unwrap();

        let mut config = (*mission(&path)).clone();
        config
            .settings
            .insert("ssh_port".into(), toml::Value::Integer(2222));

        let mut v = SshConfigValidator::new(Arc::new(config));
        let report = run_validator(&mut v).await.unwrap();
        assert!(report.is_passed());
    }
}
