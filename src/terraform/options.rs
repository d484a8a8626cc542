//! Terraform invocation options.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

use super::hcl;

/// Options for a single Terraform working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerraformOptions {
    /// Directory containing the Terraform configuration.
    #[serde(rename = "dir")]
    pub terraform_dir: PathBuf,

    /// Input variables passed with `-var`.
    #[serde(default)]
    pub vars: BTreeMap<String, Value>,

    /// Variable files passed with `-var-file`.
    #[serde(default)]
    pub var_files: Vec<PathBuf>,

    /// Environment variables set on every invocation.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Whether to pass `-no-color`.
    #[serde(default = "default_no_color")]
    pub no_color: bool,
}

fn default_no_color() -> bool {
    true
}

impl TerraformOptions {
    /// Creates options for the given directory with no variables.
    pub fn new(terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            vars: BTreeMap::new(),
            var_files: Vec::new(),
            env: BTreeMap::new(),
            no_color: default_no_color(),
        }
    }

    /// Adds an input variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Adds a variable file.
    pub fn with_var_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.var_files.push(path.into());
        self
    }

    /// Sets an environment variable for Terraform.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets whether to pass `-no-color`.
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Checks that the Terraform directory exists and can be listed.
    pub fn validate_dir(&self) -> Result<()> {
        let path = &self.terraform_dir;
        let invalid = |reason: String| Error::InvalidTerraformDir {
            path: path.clone(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }
        std::fs::read_dir(path).map_err(|e| invalid(e.to_string()))?;

        Ok(())
    }

    /// Resolves a relative directory against `base`.
    pub fn resolve_against(&mut self, base: &Path) {
        if self.terraform_dir.is_relative() {
            self.terraform_dir = base.join(&self.terraform_dir);
        }
        for file in &mut self.var_files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }

    /// Returns options that run from `dir`.
    ///
    /// Relative var files keep pointing into the original directory.
    pub fn relocated(&self, dir: &Path) -> Self {
        let mut options = self.clone();
        for file in &mut options.var_files {
            if file.is_relative() {
                *file = self.terraform_dir.join(&*file);
            }
        }
        options.terraform_dir = dir.to_path_buf();
        options
    }

    /// Returns the `-var` and `-var-file` arguments for apply and destroy.
    pub fn var_args(&self) -> Vec<String> {
        let mut args = hcl::var_args(&self.vars);
        for file in &self.var_files {
            args.push(format!("-var-file={}", file.display()));
        }
        args
    }
}
