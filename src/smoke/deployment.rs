//! Scoped Terraform deployment with guaranteed teardown.

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::terraform::{workdir, Engine, TerraformOptions};

/// Outcome of the teardown step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownStatus {
    /// Destroy has not run yet.
    Pending,
    /// Destroy completed.
    Succeeded,
    /// Destroy was attempted and failed.
    Failed(String),
}

/// A Terraform deployment that destroys itself when dropped.
///
/// The guard exists before anything is checked or applied, so every exit
/// path (bad directory, failed apply, early return, panic) runs destroy
/// exactly once.
pub struct Deployment<'e, E: Engine + ?Sized> {
    engine: &'e E,
    options: TerraformOptions,
    /// Apply from a private copy of the Terraform directory.
    isolate: bool,
    teardown: TeardownStatus,
    /// Private copy; declared last so it outlives the destroy in `Drop`.
    workdir: Option<TempDir>,
}

impl<'e, E: Engine + ?Sized> Deployment<'e, E> {
    /// Registers teardown for `options` without touching anything yet.
    pub fn register(engine: &'e E, options: TerraformOptions) -> Self {
        tracing::debug!(
            engine = engine.name(),
            dir = ?options.terraform_dir,
            "registered deployment teardown"
        );

        Self {
            engine,
            options,
            isolate: true,
            teardown: TeardownStatus::Pending,
            workdir: None,
        }
    }

    /// Sets whether apply runs from a private copy of the directory.
    pub fn with_isolation(mut self, isolate: bool) -> Self {
        self.isolate = isolate;
        self
    }

    /// Returns the options in effect, pointing at the private copy once
    /// apply has started.
    pub fn options(&self) -> &TerraformOptions {
        &self.options
    }

    /// Returns the teardown status.
    pub fn teardown_status(&self) -> &TeardownStatus {
        &self.teardown
    }

    /// Checks the directory, copies it when isolated, then runs init and apply.
    pub fn init_and_apply(&mut self) -> Result<String> {
        self.options.validate_dir()?;

        if self.isolate && self.workdir.is_none() {
            let copy = workdir::copy_to_temp(&self.options.terraform_dir)?;
            self.options = self.options.relocated(copy.path());
            self.workdir = Some(copy);
        }

        tracing::info!(dir = ?self.options.terraform_dir, "applying configuration");
        self.engine.init_and_apply(&self.options)
    }

    /// Reads a named output.
    pub fn output(&self, name: &str) -> Result<String> {
        self.engine.output(&self.options, name)
    }

    /// Destroys the deployment.
    ///
    /// Only the first call reaches the engine. A failure is recorded and
    /// returned but never retried.
    pub fn destroy(&mut self) -> Result<()> {
        match &self.teardown {
            TeardownStatus::Succeeded => return Ok(()),
            TeardownStatus::Failed(msg) => return Err(Error::Teardown(msg.clone())),
            TeardownStatus::Pending => {}
        }

        tracing::info!(dir = ?self.options.terraform_dir, "destroying configuration");

        match self.engine.destroy(&self.options) {
            Ok(_) => {
                self.teardown = TeardownStatus::Succeeded;
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::warn!(
                    dir = ?self.options.terraform_dir,
                    error = %msg,
                    "failed to destroy configuration"
                );
                self.teardown = TeardownStatus::Failed(msg.clone());
                Err(Error::Teardown(msg))
            }
        }
    }

    /// Destroys the deployment and returns the final status.
    pub fn finish(mut self) -> TeardownStatus {
        let _ = self.destroy();
        self.teardown.clone()
    }
}

impl<E: Engine + ?Sized> Drop for Deployment<'_, E> {
    fn drop(&mut self) {
        if self.teardown == TeardownStatus::Pending {
            // Failure is already logged by destroy.
            let _ = self.destroy();
        }
    }
}
