//! Error types for the contact-form E2E suite

use thiserror::Error;

use crate::model::FormField;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Target page unreachable: {0}")]
    TargetUnreachable(String),

    #[error("Unknown expected result '{value}' for test case {case_id}")]
    UnknownOutcome { case_id: String, value: String },

    #[error("No option labelled '{label}' in the {field} dropdown")]
    NoSuchOption { field: String, label: String },

    #[error("No locator configured for field: {0}")]
    UnmappedField(FormField),

    #[error("State field never became available for required-state country '{country}'")]
    StateFieldRequired { country: String },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("[{case_id}] {message}")]
    AssertionFailed { case_id: String, message: String },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
