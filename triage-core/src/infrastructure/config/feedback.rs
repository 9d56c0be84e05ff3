// triage-core/src/infrastructure/config/feedback.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::infrastructure::error::InfrastructureError;

/// Tracker-side settings for the feedback commands.
///
/// Layering, lowest to highest precedence: `triage.yaml` next to the
/// reports (or one level up), then `TRIAGE_*` environment variables, then
/// CLI flags (applied by the caller through `with_owner`).
#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
pub struct FeedbackConfig {
    /// Organization owning the per-subject tracker repositories.
    #[validate(length(min = 1, message = "tracker owner must not be empty"))]
    #[serde(default)]
    pub owner: String,

    /// Repository override. When unset, the repository is the bound
    /// subject of the run.
    #[serde(default)]
    pub repository: Option<String>,

    /// Tracker API root override (GitHub Enterprise, test stand-ins).
    #[serde(rename = "api-url", default)]
    pub api_url: Option<String>,
}

impl FeedbackConfig {
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        if let Some(owner) = owner {
            self.owner = owner;
        }
        self
    }

    /// The repository the run posts into.
    pub fn repository_for(&self, subject: &str) -> String {
        self.repository
            .clone()
            .unwrap_or_else(|| subject.to_string())
    }

    pub fn ensure_valid(&self) -> Result<(), InfrastructureError> {
        self.validate()
            .map_err(|e| InfrastructureError::Config(e.to_string()))
    }
}

/// Load the feedback config for a report directory.
///
/// Missing file is fine (everything can come from the environment and
/// flags); a present-but-corrupt file is not.
pub fn load_feedback_config(report_dir: &Path) -> Result<FeedbackConfig, InfrastructureError> {
    let mut config = match find_config_file(report_dir) {
        Some(path) => {
            info!(path = %path.display(), "Loading feedback configuration");
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        }
        None => FeedbackConfig::default(),
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

fn find_config_file(report_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        report_dir.join("triage.yaml"),
        report_dir.join("..").join("triage.yaml"),
    ];
    candidates.into_iter().find(|p| p.exists())
}

fn apply_env_overrides(config: &mut FeedbackConfig) {
    // TRIAGE_OWNER=acme triage generate ...
    if let Ok(val) = std::env::var("TRIAGE_OWNER") {
        config.owner = val;
    }
    if let Ok(val) = std::env::var("TRIAGE_API_URL") {
        config.api_url = Some(val);
    }
}
