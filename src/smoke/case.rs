//! Smoke case loading and the built-in pipeline cases.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::terraform::TerraformOptions;

use super::Expectation;

/// Output exposed by the pipeline configuration.
pub const PIPELINE_NAME_OUTPUT: &str = "codepipeline_name";

/// Pipeline name the equality case provisions and expects back.
pub const PIPELINE_NAME: &str = "my-devops-project-pipeline";

/// CodeStar connection the equality case wires the pipeline to.
pub const CODESTAR_CONNECTION_ARN: &str =
    "arn:aws:codeconnections:eu-north-1:932117065109:connection/53a86147-18c6-4a50-b31e-4b3aecd20069";

/// A smoke case: what to apply and which output to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeCase {
    /// Case name.
    pub name: String,

    /// Description of what this case checks.
    #[serde(default)]
    pub description: String,

    /// Terraform directory and variables.
    pub terraform: TerraformOptions,

    /// Output to read after apply.
    pub output: String,

    /// Check applied to the output value.
    pub expect: Expectation,
}

impl SmokeCase {
    /// Creates a case.
    pub fn new(
        name: impl Into<String>,
        terraform: TerraformOptions,
        output: impl Into<String>,
        expect: Expectation,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            terraform,
            output: output.into(),
            expect,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Applies the pipeline with explicit variables and expects the exact name back.
    pub fn pipeline_name_equals(terraform_dir: impl AsRef<Path>) -> Self {
        let terraform = TerraformOptions::new(terraform_dir.as_ref())
            .with_var("codepipeline_name", PIPELINE_NAME)
            .with_var("codestar_connection_arn", CODESTAR_CONNECTION_ARN);

        Self::new(
            "pipeline-name-equals",
            terraform,
            PIPELINE_NAME_OUTPUT,
            Expectation::Equals(PIPELINE_NAME.to_string()),
        )
        .with_description("pipeline output matches the requested name")
    }

    /// Applies the pipeline with its defaults and expects some name back.
    pub fn pipeline_name_present(terraform_dir: impl AsRef<Path>) -> Self {
        Self::new(
            "pipeline-name-present",
            TerraformOptions::new(terraform_dir.as_ref()),
            PIPELINE_NAME_OUTPUT,
            Expectation::NonEmpty,
        )
        .with_description("pipeline output is set")
    }

    /// Loads a case from a YAML or TOML file.
    ///
    /// Relative paths inside the case resolve against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;

        let mut case = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            other => {
                return Err(Error::Config(format!(
                    "unsupported case file extension {:?}: {}",
                    other,
                    path.display()
                )))
            }
        };

        if let Some(base) = path.parent() {
            case.terraform.resolve_against(base);
        }

        Ok(case)
    }

    /// Parses a case from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse case: {}", e)))
    }

    /// Parses a case from TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse case: {}", e)))
    }
}
