//! Pipeline Smoke - Terraform smoke tests for the CodePipeline deployment
//!
//! This library applies a Terraform configuration, reads a named output, checks
//! it against an expectation, and guarantees `terraform destroy` on every exit
//! path.

pub mod config;
pub mod error;
pub mod smoke;
pub mod terraform;

pub use config::{settings, SmokeSettings, Validate, ValidationResult};
pub use error::Error;
pub use smoke::{
    Deployment, Expectation, SmokeCase, SmokeHarness, SmokeResult, TeardownStatus,
    CODESTAR_CONNECTION_ARN, PIPELINE_NAME, PIPELINE_NAME_OUTPUT,
};
pub use terraform::{Engine, TerraformCli, TerraformOptions};
