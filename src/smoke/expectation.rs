//! Checks applied to an output value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What an output value must look like for a case to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Value must equal this string exactly.
    Equals(String),
    /// Value must not be empty.
    NonEmpty,
}

impl Expectation {
    /// Checks `actual` against the expectation.
    pub fn check(&self, actual: &str) -> Result<()> {
        let passed = match self {
            Expectation::Equals(expected) => actual == expected,
            Expectation::NonEmpty => !actual.is_empty(),
        };

        if passed {
            Ok(())
        } else {
            Err(Error::Assertion {
                expected: self.describe(),
                actual: actual.to_string(),
            })
        }
    }

    /// Human-readable form used in assertion messages.
    pub fn describe(&self) -> String {
        match self {
            Expectation::Equals(expected) => format!("{:?}", expected),
            Expectation::NonEmpty => "a non-empty value".to_string(),
        }
    }
}
