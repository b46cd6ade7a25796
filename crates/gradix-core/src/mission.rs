//! Mission configuration: the TOML document that declares what to grade.
//!
//! Loads mission files, applies defaults, and lints them for common
//! mistakes. The `settings` table is opaque to the core; validators read
//! their own keys from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// One validator declaration: a stable registry id plus the weight its
/// score carries in the overall average.
#[derive(Debug, Clone)]
pub struct ValidatorDecl {
    pub name: String,
    pub weight: f64,
}

/// Fully resolved mission configuration.
#[derive(Debug, Clone)]
pub struct MissionConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Checklist score (0–100) each validator needs to pass.
    pub passing_score: u32,
    /// Declaration order determines execution and report order.
    pub validators: Vec<ValidatorDecl>,
    /// Where the learner's submission lives. Usually set from `settings`
    /// or overridden by the caller.
    pub submission_dir: Option<PathBuf>,
    /// Mission-specific keys, opaque to the core.
    pub settings: toml::value::Table,
}

impl MissionConfig {
    /// String-valued setting, if present.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }

    /// Integer-valued setting, if present and non-negative.
    pub fn setting_u64(&self, key: &str) -> Option<u64> {
        self.settings
            .get(key)
            .and_then(|v| v.as_integer())
            .and_then(|n| u64::try_from(n).ok())
    }

    /// Array-of-strings setting; non-string elements are skipped.
    pub fn setting_strings(&self, key: &str) -> Vec<String> {
        self.settings
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// TOML parsing
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for mission files.
#[derive(Debug, Deserialize)]
struct TomlMissionFile {
    mission: TomlMissionHeader,
    #[serde(default)]
    validators: Vec<TomlValidatorDecl>,
    #[serde(default)]
    settings: toml::value::Table,
}

#[derive(Debug, Deserialize)]
struct TomlMissionHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_passing_score")]
    passing_score: u32,
}

fn default_passing_score() -> u32 {
    70
}

#[derive(Debug, Deserialize)]
struct TomlValidatorDecl {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Parse a mission configuration file.
pub fn parse_mission(path: &Path) -> Result<MissionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read mission config: {}", path.display()))?;
    parse_mission_str(&content, path)
}

/// Parse a mission configuration from a TOML string (useful for testing).
pub fn parse_mission_str(content: &str, source_path: &Path) -> Result<MissionConfig> {
    let parsed: TomlMissionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let submission_dir = parsed
        .settings
        .get("submission_dir")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);

    Ok(MissionConfig {
        id: parsed.mission.id,
        name: parsed.mission.name,
        description: parsed.mission.description,
        passing_score: parsed.mission.passing_score,
        validators: parsed
            .validators
            .into_iter()
            .map(|d| ValidatorDecl {
                name: d.name,
                weight: d.weight,
            })
            .collect(),
        submission_dir,
        settings: parsed.settings,
    })
}

// ---------------------------------------------------------------------------
// Linting
// ---------------------------------------------------------------------------

/// A non-fatal warning from mission config linting.
#[derive(Debug, Clone)]
pub struct LintWarning {
    /// The validator declaration the warning refers to, if any.
    pub validator: Option<String>,
    pub message: String,
}

/// Lint a mission configuration for common issues.
pub fn lint_mission(config: &MissionConfig) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    if config.validators.is_empty() {
        warnings.push(LintWarning {
            validator: None,
            message: "no validators declared; the run will always fail with score 0".into(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for decl in &config.validators {
        if !seen.insert(&decl.name) {
            warnings.push(LintWarning {
                validator: Some(decl.name.clone()),
                message: format!("validator '{}' declared more than once", decl.name),
            });
        }
    }

    for decl in &config.validators {
        if decl.weight <= 0.0 {
            warnings.push(LintWarning {
                validator: Some(decl.name.clone()),
                message: format!(
                    "validator '{}' has non-positive weight {}; its score will not count toward the weighted average",
                    decl.name, decl.weight
                ),
            });
        }
    }

    if config.passing_score > 100 {
        warnings.push(LintWarning {
            validator: None,
            message: format!(
                "passing_score {} is above 100 and can never be reached",
                config.passing_score
            ),
        });
    }

    warnings
}
