//! Pipeline smoke tests.
//!
//! Applies a Terraform configuration, reads one output, checks it, and
//! destroys everything on the way out.

pub mod case;
pub mod deployment;
pub mod expectation;
pub mod harness;
#[cfg(test)]
pub(crate) mod testing;

pub use case::{SmokeCase, CODESTAR_CONNECTION_ARN, PIPELINE_NAME, PIPELINE_NAME_OUTPUT};
pub use deployment::{Deployment, TeardownStatus};
pub use expectation::Expectation;
pub use harness::{SmokeHarness, SmokeResult};
