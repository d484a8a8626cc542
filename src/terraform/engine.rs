//! The seam between smoke tests and the infrastructure engine.

use crate::error::Result;

use super::TerraformOptions;

/// Trait for engines that provision and tear down a configuration.
///
/// Every call blocks until the engine finishes. Apply and destroy can take
/// as long as the providers need.
pub trait Engine: Send + Sync {
    /// Initializes the working directory and applies the configuration.
    ///
    /// Returns the engine's standard output.
    fn init_and_apply(&self, options: &TerraformOptions) -> Result<String>;

    /// Destroys everything the configuration created.
    fn destroy(&self, options: &TerraformOptions) -> Result<String>;

    /// Reads a single named output from the applied configuration.
    fn output(&self, options: &TerraformOptions, name: &str) -> Result<String>;

    /// Returns the name of this engine.
    fn name(&self) -> &str;
}
