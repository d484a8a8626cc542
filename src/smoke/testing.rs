//! In-memory engine for guard and harness tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::terraform::{Engine, TerraformOptions};

/// Engine that records every call and answers from canned outputs.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<String>>,
    outputs: BTreeMap<String, String>,
    fail_apply: bool,
    fail_destroy: bool,
}

impl RecordingEngine {
    pub fn with_output(mut self, name: &str, value: &str) -> Self {
        self.outputs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn failing_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn destroy_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.as_str() == "destroy").count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn failure(command: &str) -> Error {
        Error::Engine {
            command: format!("terraform {}", command),
            status: "exit status: 1".to_string(),
            stderr: format!("Error: {} exploded", command),
        }
    }
}

impl Engine for RecordingEngine {
    fn init_and_apply(&self, _options: &TerraformOptions) -> Result<String> {
        self.record("apply");
        if self.fail_apply {
            return Err(Self::failure("apply"));
        }
        Ok("Apply complete!".to_string())
    }

    fn destroy(&self, _options: &TerraformOptions) -> Result<String> {
        self.record("destroy");
        if self.fail_destroy {
            return Err(Self::failure("destroy"));
        }
        Ok("Destroy complete!".to_string())
    }

    fn output(&self, _options: &TerraformOptions, name: &str) -> Result<String> {
        self.record(format!("output {}", name));
        self.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::OutputNotFound {
                name: name.to_string(),
                available: self.outputs.keys().cloned().collect(),
            })
    }

    fn name(&self) -> &str {
        "recording"
    }
}
