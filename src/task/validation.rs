use reqwest::Url;
use thiserror::Error;

use crate::selector::RandomnessHeuristic;
use crate::task::task_model::TaskConfig;

/// Why a task config cannot be turned into code. One reason per failure,
/// checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskConfigError {
    #[error("form selector is required")]
    MissingFormSelector,

    #[error("form selector '{0}' looks generated and will not survive a reload")]
    RandomFormSelector(String),

    #[error("success selector '{0}' looks generated and will not survive a reload")]
    RandomSuccessSelector(String),

    #[error("success text is set but no success selector is given")]
    MissingSuccessSelector,

    #[error("task url '{url}' is not a valid absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Check a task config before generation.
pub fn validate_config(config: &TaskConfig, heuristic: &RandomnessHeuristic) -> Result<(), TaskConfigError> {
    let form_selector = config.form_selector.trim();
    if form_selector.is_empty() {
        return Err(TaskConfigError::MissingFormSelector);
    }
    if heuristic.is_random(form_selector) {
        return Err(TaskConfigError::RandomFormSelector(form_selector.to_string()));
    }

    if let Some(success) = config.success_selector() {
        if heuristic.is_random(success) {
            return Err(TaskConfigError::RandomSuccessSelector(success.to_string()));
        }
    }
    if config.success_text().is_some() && config.success_selector().is_none() {
        return Err(TaskConfigError::MissingSuccessSelector);
    }

    task_path(&config.url).map(|_| ())
}

/// Path component of the task URL, used as the task registration key.
pub fn task_path(url: &str) -> Result<String, TaskConfigError> {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .map_err(|e| TaskConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
