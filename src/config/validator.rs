//! Configuration validation.
//!
//! Checks the loaded configuration for values that would make every run fail
//! (bad base URL, empty theme catalog, zero transaction size) and flags
//! suspicious but usable values as warnings.

use crate::config::schema::Config;
use crate::error::{GisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    /// Error - blocks operation
    Error,
    /// Warning - advisory only
    Warning,
}

/// A validation issue found in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    /// Config key the issue belongs to (e.g., "fetch.base_url")
    pub section: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Error,
            section: section.into(),
            message: message.into(),
        }
    }

    fn warning(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Warning,
            section: section.into(),
            message: message.into(),
        }
    }
}

/// Result of configuration validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }

    /// Log warnings and turn errors into a single configuration error.
    pub fn into_result(self) -> Result<()> {
        for warning in self.warnings() {
            tracing::warn!("config {}: {}", warning.section, warning.message);
        }

        let errors: Vec<String> = self
            .errors()
            .map(|e| format!("{}: {}", e.section, e.message))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GisError::Config(errors.join("; ")))
        }
    }
}

/// Validate a configuration.
pub fn validate(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(issue) = validate_base_url(&config.fetch.base_url) {
        result.issues.push(issue);
    }

    validate_themes(&config.fetch.themes, &mut result);

    if config.fetch.retry_count > 10 {
        result.issues.push(ValidationIssue::warning(
            "fetch.retry_count",
            format!(
                "{} retries with exponential backoff can take a very long time",
                config.fetch.retry_count
            ),
        ));
    }

    if config.fetch.timeout_secs == 0 {
        result.issues.push(ValidationIssue::error(
            "fetch.timeout_secs",
            "timeout must be at least 1 second",
        ));
    }

    if config.ogr.srs.trim().is_empty() {
        result
            .issues
            .push(ValidationIssue::error("ogr.srs", "spatial reference is empty"));
    }

    if config.gpkg.transaction_size == 0 {
        result.issues.push(ValidationIssue::error(
            "gpkg.transaction_size",
            "transaction size must be greater than 0",
        ));
    }

    result
}

fn validate_base_url(base_url: &str) -> Option<ValidationIssue> {
    match url::Url::parse(base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
        Ok(parsed) => Some(ValidationIssue::error(
            "fetch.base_url",
            format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        )),
        Err(e) => Some(ValidationIssue::error(
            "fetch.base_url",
            format!("invalid URL '{}': {}", base_url, e),
        )),
    }
}

fn validate_themes(themes: &[String], result: &mut ValidationResult) {
    if themes.is_empty() {
        result
            .issues
            .push(ValidationIssue::error("fetch.themes", "theme list is empty"));
        return;
    }

    let mut seen = HashSet::new();
    for theme in themes {
        if theme.is_empty()
            || theme.contains(['/', '\\'])
            || theme.chars().any(char::is_whitespace)
        {
            result.issues.push(ValidationIssue::error(
                "fetch.themes",
                format!("invalid theme name '{}'", theme),
            ));
        } else if !seen.insert(theme.as_str()) {
            result.issues.push(ValidationIssue::warning(
                "fetch.themes",
                format!("duplicate theme '{}'", theme),
            ));
        }
    }
}
