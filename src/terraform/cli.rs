//! Terraform CLI engine.

use std::collections::BTreeMap;
use std::process::Command;

use serde_json::Value;

use crate::error::{Error, Result};

use super::{Engine, TerraformOptions};

/// Stderr fragment Terraform prints when an output name is unknown.
const OUTPUT_NOT_FOUND: &str = "output variable requested could not be found";

/// Engine that shells out to the `terraform` binary.
pub struct TerraformCli {
    /// Path to the terraform binary.
    binary: String,
}

impl Default for TerraformCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TerraformCli {
    /// Creates an engine using `terraform` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: "terraform".to_string(),
        }
    }

    /// Creates an engine using a specific binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the binary this engine runs.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Builds arguments for `terraform init`.
    fn init_args(&self, options: &TerraformOptions) -> Vec<String> {
        let mut args = vec!["init".to_string(), "-input=false".to_string()];
        if options.no_color {
            args.push("-no-color".to_string());
        }
        args
    }

    /// Builds arguments for `terraform apply` or `terraform destroy`.
    fn lifecycle_args(&self, subcommand: &str, options: &TerraformOptions) -> Vec<String> {
        let mut args = vec![
            subcommand.to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
        ];
        if options.no_color {
            args.push("-no-color".to_string());
        }
        args.extend(options.var_args());
        args
    }

    /// Builds arguments for `terraform output -json [name]`.
    fn output_args(&self, options: &TerraformOptions, name: Option<&str>) -> Vec<String> {
        let mut args = vec!["output".to_string(), "-json".to_string()];
        if options.no_color {
            args.push("-no-color".to_string());
        }
        if let Some(name) = name {
            args.push(name.to_string());
        }
        args
    }

    /// Runs terraform with the given arguments and returns stdout.
    fn run(&self, options: &TerraformOptions, args: &[String]) -> Result<String> {
        let command = format!("{} {}", self.binary, args.join(" "));

        tracing::info!(
            command = %command,
            dir = ?options.terraform_dir,
            "running terraform"
        );

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&options.terraform_dir)
            .env("TF_IN_AUTOMATION", "1")
            .env("TF_INPUT", "0")
            .envs(&options.env)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.lines() {
            if crate::config::is_debug() {
                tracing::info!(line = %line, "terraform stdout");
            } else {
                tracing::debug!(line = %line, "terraform stdout");
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::Engine {
                command,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(stdout)
    }

    /// Lists output names for diagnostics; empty if they cannot be read.
    fn available_outputs(&self, options: &TerraformOptions) -> Vec<String> {
        match self.output_all(options) {
            Ok(outputs) => outputs.into_keys().collect(),
            Err(e) => {
                tracing::debug!(error = %e, "failed to list outputs");
                Vec::new()
            }
        }
    }

    /// Reads every output as a name to value map.
    pub fn output_all(&self, options: &TerraformOptions) -> Result<BTreeMap<String, Value>> {
        let stdout = self.run(options, &self.output_args(options, None))?;
        parse_output_map(&stdout)
    }
}

impl Engine for TerraformCli {
    fn init_and_apply(&self, options: &TerraformOptions) -> Result<String> {
        let mut stdout = self.run(options, &self.init_args(options))?;
        stdout.push_str(&self.run(options, &self.lifecycle_args("apply", options))?);
        Ok(stdout)
    }

    fn destroy(&self, options: &TerraformOptions) -> Result<String> {
        self.run(options, &self.lifecycle_args("destroy", options))
    }

    fn output(&self, options: &TerraformOptions, name: &str) -> Result<String> {
        match self.run(options, &self.output_args(options, Some(name))) {
            Ok(stdout) => decode_output(name, &stdout),
            Err(Error::Engine { stderr, .. }) if stderr.contains(OUTPUT_NOT_FOUND) => {
                let available = self.available_outputs(options);
                tracing::warn!(
                    output = %name,
                    available = ?available,
                    "requested output not found"
                );
                Err(Error::OutputNotFound {
                    name: name.to_string(),
                    available,
                })
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &str {
        "terraform"
    }
}

/// Decodes `terraform output -json <name>`.
///
/// Strings come back without quotes; any other value as compact JSON.
fn decode_output(name: &str, stdout: &str) -> Result<String> {
    let value: Value = serde_json::from_str(stdout.trim()).map_err(|e| Error::OutputDecode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(match value {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Decodes `terraform output -json`, which wraps each value with its type.
fn parse_output_map(stdout: &str) -> Result<BTreeMap<String, Value>> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(stdout.trim())
        .map_err(|e| Error::OutputDecode {
            name: "*".to_string(),
            reason: e.to_string(),
        })?;

    Ok(raw
        .into_iter()
        .map(|(name, mut entry)| {
            let value = entry
                .get_mut("value")
                .map(Value::take)
                .unwrap_or(Value::Null);
            (name, value)
        })
        .collect())
}
