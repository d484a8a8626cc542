//! Terraform engine access.
//!
//! This module provides the [`Engine`] trait for applying and destroying a
//! configuration and the [`TerraformCli`] implementation backed by the
//! `terraform` binary.

mod cli;
mod engine;
pub mod hcl;
mod options;
pub mod workdir;

pub use cli::TerraformCli;
pub use engine::Engine;
pub use options::TerraformOptions;
