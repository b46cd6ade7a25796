//! The check model: one named, point-weighted boolean probe and its outcome.

use std::fmt;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

/// Terminal status of a check.
///
/// Every check starts at `Pending` and transitions exactly once, inside
/// [`Check::execute`]: `Passed` if the probe returned `Ok(true)`, `Failed`
/// for `Ok(false)`, `Error` if the probe returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Passed,
    Failed,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pending => write!(f, "pending"),
            CheckStatus::Passed => write!(f, "passed"),
            CheckStatus::Failed => write!(f, "failed"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// Probe function bound at construction time.
///
/// `Ok(true)` means the property holds, `Ok(false)` means it does not, and
/// `Err` is the probe's failure channel (recorded, never propagated).
pub type Probe = Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<bool>> + Send + Sync>;

/// One weighted boolean check owned by a checklist.
pub struct Check {
    /// Unique identifier within the owning checklist.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Point weight. Zero is legal and contributes nothing to scoring.
    pub points: u32,
    /// Hint shown in reports when the check did not pass.
    pub hint: Option<String>,
    /// Metadata flag marking a check learners commonly get wrong.
    pub notable_trap: bool,
    probe: Probe,
    status: CheckStatus,
    error_message: Option<String>,
    duration_ms: u64,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id)
            .field("points", &self.points)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Check {
    /// Create a pending check from an async probe.
    pub fn new<F, Fut>(
        id: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        probe: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        Self {
            id: id.into(),
            description: description.into(),
            points,
            hint: None,
            notable_trap: false,
            probe: Box::new(move || probe().boxed()),
            status: CheckStatus::Pending,
            error_message: None,
            duration_ms: 0,
        }
    }

    /// Attach a hint shown when the check does not pass.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Mark this check as a notable trap. Metadata only.
    pub fn trap(mut self) -> Self {
        self.notable_trap = true;
        self
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Measured probe duration in milliseconds. Zero before execution.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Run the probe once and record the outcome.
    ///
    /// Returns whether the check passed. The probe's error is captured into
    /// `error_message` and surfaces as [`CheckStatus::Error`]; it never
    /// propagates. Duration is measured regardless of outcome. This is the
    /// only place the status field is ever written.
    pub(crate) async fn execute(&mut self) -> bool {
        debug_assert_eq!(self.status, CheckStatus::Pending, "check executed twice");

        let start = Instant::now();
        let outcome = (self.probe)().await;
        self.duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(true) => {
                self.status = CheckStatus::Passed;
                true
            }
            Ok(false) => {
                self.status = CheckStatus::Failed;
                false
            }
            Err(e) => {
                self.status = CheckStatus::Error;
                self.error_message = Some(format!("{e:#}"));
                false
            }
        }
    }

    /// Serializable per-check row. The hint is suppressed once the check
    /// has passed.
    pub fn row(&self) -> CheckRow {
        CheckRow {
            id: self.id.clone(),
            description: self.description.clone(),
            points: self.points,
            status: self.status,
            error_message: self.error_message.clone(),
            duration_ms: self.duration_ms,
            notable_trap: self.notable_trap,
            hint: if self.status == CheckStatus::Passed {
                None
            } else {
                self.hint.clone()
            },
        }
    }
}

/// Post-execution state of one check, as it appears in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRow {
    pub id: String,
    pub description: String,
    pub points: u32,
    pub status: CheckStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    pub duration_ms: u64,
    #[serde(default)]
    pub notable_trap: bool,
    #[serde(default)]
    pub hint: Option<String>,
}
