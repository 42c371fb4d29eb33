//! Entrypoint validation.
//!
//! The descriptor never decides on its own whether it is well-formed; it asks
//! a `Validator`. `ManifestValidator` is the stock rule set.

use crate::entrypoint::{Entrypoint, Strictness};
use crate::fields::{MAIN_KEY, MODULE_KEY, ShapeError, UMD_MAIN_KEY, UMD_NAME_KEY, config_key_path};
use serde::{Deserialize, Serialize};

/// How hard a validator should be on missing required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Missing required fields are reported as warnings.
    #[default]
    Advisory,
    /// Missing required fields fail validation.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One finding about one manifest key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub key: String,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(key: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<ShapeError> for ValidationIssue {
    fn from(err: ShapeError) -> Self {
        Self::new(err.key.clone(), Severity::Error, err.to_string())
    }
}

/// Validation failed; `issues` holds every finding, errors and warnings alike.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entrypoint validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Error findings only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    let messages: Vec<&str> = issues
        .iter()
        .filter(|issue| issue.is_error())
        .map(|issue| issue.message.as_str())
        .collect();
    if messages.is_empty() {
        "no error details".to_string()
    } else {
        messages.join("; ")
    }
}

/// Decides whether an entrypoint is well-formed.
///
/// `Ok` carries warnings; `Err` means the entrypoint must not be used in the
/// requested mode.
pub trait Validator {
    fn validate<S: Strictness>(
        &self,
        entrypoint: &Entrypoint<S>,
        mode: ValidationMode,
    ) -> Result<Vec<ValidationIssue>, ValidationError>;
}

impl<V: Validator + ?Sized> Validator for &V {
    fn validate<S: Strictness>(
        &self,
        entrypoint: &Entrypoint<S>,
        mode: ValidationMode,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        (**self).validate(entrypoint, mode)
    }
}

/// Stock rules for entrypoint manifests.
///
/// - every declared field must have its declared shape (always an error)
/// - `main` must be set (error in strict mode, warning otherwise)
/// - `umd:main` requires `prebundle.umdName` (error in strict mode, warning otherwise)
/// - `module` without `main` is a warning
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestValidator;

impl Validator for ManifestValidator {
    fn validate<S: Strictness>(
        &self,
        entrypoint: &Entrypoint<S>,
        mode: ValidationMode,
    ) -> Result<Vec<ValidationIssue>, ValidationError> {
        let required = match mode {
            ValidationMode::Advisory => Severity::Warning,
            ValidationMode::Strict => Severity::Error,
        };
        let mut issues = Vec::new();

        let main = record(&mut issues, entrypoint.declared_primary_output());
        let module = record(&mut issues, entrypoint.module_output());
        record(&mut issues, entrypoint.browser_output());
        record(&mut issues, entrypoint.platform_output());
        record(&mut issues, entrypoint.source_entry());
        let umd_main = record(&mut issues, entrypoint.umd_output());
        let umd_name = record(&mut issues, entrypoint.umd_global_name());

        if matches!(main, Some(None)) {
            issues.push(ValidationIssue::new(
                MAIN_KEY,
                required,
                "`main` field is not set",
            ));
            if matches!(module, Some(Some(_))) {
                issues.push(ValidationIssue::new(
                    MODULE_KEY,
                    Severity::Warning,
                    "`module` is set but `main` is not",
                ));
            }
        }

        if matches!(umd_main, Some(Some(_))) && matches!(umd_name, Some(None)) {
            issues.push(ValidationIssue::new(
                UMD_MAIN_KEY,
                required,
                format!(
                    "`{UMD_MAIN_KEY}` is set but `{}` is not",
                    config_key_path(UMD_NAME_KEY)
                ),
            ));
        }

        if issues.iter().any(ValidationIssue::is_error) {
            Err(ValidationError { issues })
        } else {
            Ok(issues)
        }
    }
}

/// Push a shape error as an issue; pass through successful reads.
fn record<T>(issues: &mut Vec<ValidationIssue>, read: Result<T, ShapeError>) -> Option<T> {
    match read {
        Ok(value) => Some(value),
        Err(err) => {
            issues.push(err.into());
            None
        }
    }
}
