//! Environment settings and case validation.
//!
//! Environment variables:
//! - `SMOKE_TERRAFORM_BIN` - Terraform binary to run (default: `terraform`)
//! - `SMOKE_TERRAFORM_DIR` - Overrides the directory of every case
//! - `SMOKE_DEBUG=1` - Log Terraform stdout at info level

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::smoke::{Expectation, SmokeCase};

/// Global settings loaded once at startup.
static SETTINGS: OnceLock<SmokeSettings> = OnceLock::new();

/// Settings read from the environment.
#[derive(Debug, Clone, Default)]
pub struct SmokeSettings {
    /// Terraform binary override.
    pub terraform_bin: Option<String>,
    /// Terraform directory override applied to every case.
    pub terraform_dir: Option<PathBuf>,
    /// Log Terraform stdout at info level.
    pub debug_mode: bool,
}

impl SmokeSettings {
    /// Loads settings from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| non_empty(lookup(key));
        Self {
            terraform_bin: var("SMOKE_TERRAFORM_BIN"),
            terraform_dir: var("SMOKE_TERRAFORM_DIR").map(PathBuf::from),
            debug_mode: var("SMOKE_DEBUG")
                .map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Applies the directory override to a case.
    pub fn apply_to(&self, case: &mut SmokeCase) {
        if let Some(dir) = &self.terraform_dir {
            case.terraform.terraform_dir = dir.clone();
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Gets the global settings.
pub fn settings() -> &'static SmokeSettings {
    SETTINGS.get_or_init(SmokeSettings::from_env)
}

/// Returns true if debug mode is enabled.
pub fn is_debug() -> bool {
    settings().debug_mode
}

/// Validation result containing all found issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validate {
    /// Validates the configuration and returns any issues found.
    fn validate(&self) -> ValidationResult;
}

impl Validate for SmokeCase {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.name.trim().is_empty() {
            result.add_error("case name cannot be empty");
        }

        if self.output.trim().is_empty() {
            result.add_error("output name cannot be empty");
        }

        if let Expectation::Equals(expected) = &self.expect {
            if expected.is_empty() {
                result.add_error("equals expectation cannot be empty; use non_empty instead");
            }
        }

        for name in self.terraform.vars.keys() {
            if name.trim().is_empty() {
                result.add_error("variable names cannot be empty");
            }
        }

        if self.terraform.terraform_dir.as_os_str().is_empty() {
            result.add_error("terraform dir cannot be empty");
        } else if self.terraform.terraform_dir.is_relative() {
            result.add_warning(format!(
                "terraform dir '{}' is relative to the working directory",
                self.terraform.terraform_dir.display()
            ));
        }

        result
    }
}
