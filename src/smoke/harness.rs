//! Smoke case orchestrator.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::terraform::Engine;

use super::case::SmokeCase;
use super::deployment::{Deployment, TeardownStatus};

/// Result of a smoke case run.
#[derive(Debug)]
pub struct SmokeResult {
    /// Identifier for this run, used to correlate logs.
    pub run_id: String,
    /// The case that was run.
    pub case_name: String,
    /// Whether apply succeeded.
    pub applied: bool,
    /// Output value read after apply.
    pub output_value: Option<String>,
    /// Overall pass/fail. Teardown failures do not change it.
    pub passed: bool,
    /// First failure of the run.
    pub error: Option<Error>,
    /// What happened during teardown.
    pub teardown: TeardownStatus,
}

impl SmokeResult {
    fn new(case_name: &str) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            case_name: case_name.to_string(),
            applied: false,
            output_value: None,
            passed: false,
            error: None,
            teardown: TeardownStatus::Pending,
        }
    }

    /// Converts the result into the case outcome.
    pub fn into_outcome(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None if self.passed => Ok(()),
            None => Err(Error::Task(format!("case '{}' did not pass", self.case_name))),
        }
    }
}

impl fmt::Display for SmokeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Case: {}", self.case_name)?;
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f, "Applied: {}", self.applied)?;
        if let Some(value) = &self.output_value {
            writeln!(f, "Output: {}", value)?;
        }
        writeln!(f, "Passed: {}", self.passed)?;
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        write!(f, "Teardown: {:?}", self.teardown)
    }
}

/// Runs smoke cases against an engine.
///
/// Each run applies from its own copy of the case's Terraform directory
/// unless isolation is turned off.
pub struct SmokeHarness<E: Engine> {
    engine: Arc<E>,
    isolate: bool,
}

impl<E: Engine> Clone for SmokeHarness<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            isolate: self.isolate,
        }
    }
}

impl<E: Engine> SmokeHarness<E> {
    /// Creates a harness for the given engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            isolate: true,
        }
    }

    /// Sets whether runs apply from a private copy of the directory.
    pub fn with_isolation(mut self, isolate: bool) -> Self {
        self.isolate = isolate;
        self
    }

    /// Returns the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs a case: register teardown, apply, read output, check, destroy.
    ///
    /// Never panics; every failure lands in the returned result.
    pub fn run(&self, case: &SmokeCase) -> SmokeResult {
        let mut result = SmokeResult::new(&case.name);

        tracing::info!(
            case = %case.name,
            run_id = %result.run_id,
            engine = self.engine.name(),
            "running smoke case"
        );

        let mut deployment = Deployment::register(self.engine.as_ref(), case.terraform.clone())
            .with_isolation(self.isolate);

        let outcome = Self::apply_and_check(&mut deployment, case, &mut result);
        result.teardown = deployment.finish();

        match outcome {
            Ok(()) => result.passed = true,
            Err(e) => {
                tracing::warn!(
                    case = %case.name,
                    run_id = %result.run_id,
                    error = %e,
                    "smoke case failed"
                );
                result.error = Some(e);
            }
        }

        tracing::info!(
            case = %case.name,
            run_id = %result.run_id,
            passed = result.passed,
            teardown = ?result.teardown,
            "smoke case finished"
        );

        result
    }

    fn apply_and_check(
        deployment: &mut Deployment<'_, E>,
        case: &SmokeCase,
        result: &mut SmokeResult,
    ) -> Result<()> {
        deployment.init_and_apply()?;
        result.applied = true;

        let value = deployment.output(&case.output)?;
        tracing::info!(output = %case.output, value = %value, "read output");
        result.output_value = Some(value.clone());

        case.expect.check(&value)
    }
}

impl<E: Engine + 'static> SmokeHarness<E> {
    /// Runs cases concurrently on the blocking pool.
    ///
    /// Results come back in the same order as `cases`.
    pub async fn run_all(&self, cases: Vec<SmokeCase>) -> Vec<SmokeResult> {
        let handles: Vec<_> = cases
            .into_iter()
            .map(|case| {
                let harness = self.clone();
                let name = case.name.clone();
                let handle = tokio::task::spawn_blocking(move || harness.run(&case));
                (name, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(case = %name, error = %e, "smoke case task failed");
                    let mut result = SmokeResult::new(&name);
                    result.error = Some(Error::Task(e.to_string()));
                    results.push(result);
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::testing::RecordingEngine;
    use crate::smoke::{Expectation, PIPELINE_NAME, PIPELINE_NAME_OUTPUT};
    use crate::terraform::TerraformOptions;
    use tempfile::TempDir;

    fn pipeline_engine(value: &str) -> RecordingEngine {
        RecordingEngine::default().with_output(PIPELINE_NAME_OUTPUT, value)
    }

    #[test]
    fn equality_case_passes_on_matching_output() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME));

        let result = harness.run(&SmokeCase::pipeline_name_equals(temp.path()));

        assert!(result.passed, "{}", result);
        assert!(result.applied);
        assert_eq!(result.output_value.as_deref(), Some(PIPELINE_NAME));
        assert_eq!(result.teardown, TeardownStatus::Succeeded);
        assert_eq!(
            harness.engine().calls(),
            vec!["apply", "output codepipeline_name", "destroy"]
        );
    }

    #[test]
    fn non_empty_case_passes_on_any_value() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine("whatever-pipeline"));

        let result = harness.run(&SmokeCase::pipeline_name_present(temp.path()));

        assert!(result.passed);
        assert!(result.into_outcome().is_ok());
    }

    #[test]
    fn assertion_failure_still_destroys() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine("other-pipeline"));

        let result = harness.run(&SmokeCase::pipeline_name_equals(temp.path()));

        assert!(!result.passed);
        assert!(matches!(result.error, Some(Error::Assertion { .. })));
        assert_eq!(harness.engine().destroy_calls(), 1);
    }

    #[test]
    fn apply_failure_fails_and_destroys_once() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME).failing_apply());

        let result = harness.run(&SmokeCase::pipeline_name_equals(temp.path()));

        assert!(!result.passed);
        assert!(!result.applied);
        assert!(matches!(result.error, Some(Error::Engine { .. })));
        assert_eq!(harness.engine().calls(), vec!["apply", "destroy"]);
    }

    #[test]
    fn missing_output_fails_with_output_not_found() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(RecordingEngine::default());
        let case = SmokeCase::new(
            "missing",
            TerraformOptions::new(temp.path()),
            "no_such_output",
            Expectation::NonEmpty,
        );

        let result = harness.run(&case);

        match &result.error {
            Some(Error::OutputNotFound { name, available }) => {
                assert_eq!(name, "no_such_output");
                assert!(available.is_empty());
            }
            other => panic!("Expected OutputNotFound, got {:?}", other),
        }
        assert_eq!(harness.engine().destroy_calls(), 1);
    }

    #[test]
    fn teardown_failure_is_reported_without_failing_case() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME).failing_destroy());

        let result = harness.run(&SmokeCase::pipeline_name_equals(temp.path()));

        assert!(result.passed);
        assert!(matches!(result.teardown, TeardownStatus::Failed(_)));
        assert_eq!(harness.engine().destroy_calls(), 1);
    }

    #[test]
    fn missing_output_lists_available_outputs() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME));
        let case = SmokeCase::new(
            "wrong-output",
            TerraformOptions::new(temp.path()),
            "pipeline_arn",
            Expectation::NonEmpty,
        );

        let err = harness.run(&case).into_outcome().unwrap_err();

        assert!(err.to_string().contains("available outputs: [codepipeline_name]"));
    }

    #[test]
    fn invalid_dir_fails_and_still_destroys_once() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME));

        let result = harness.run(&SmokeCase::pipeline_name_equals(temp.path().join("gone")));

        assert!(!result.passed);
        assert!(!result.applied);
        assert!(matches!(result.error, Some(Error::InvalidTerraformDir { .. })));
        assert_eq!(result.teardown, TeardownStatus::Succeeded);
        assert_eq!(harness.engine().calls(), vec!["destroy"]);
    }

    #[tokio::test]
    async fn run_all_keeps_input_order() {
        let temp = TempDir::new().unwrap();
        let harness = SmokeHarness::new(pipeline_engine(PIPELINE_NAME));
        let cases = vec![
            SmokeCase::pipeline_name_equals(temp.path()),
            SmokeCase::pipeline_name_present(temp.path()),
        ];

        let results = harness.run_all(cases).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].case_name, "pipeline-name-equals");
        assert_eq!(results[1].case_name, "pipeline-name-present");
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(harness.engine().destroy_calls(), 2);
    }
}
