//! Test outcomes - the disposition of one test run

use atlas_test_runtime::RuntimeError;

/// Build the `module::function` name every outcome carries
pub fn qualified_name(module_name: &str, function_name: &str) -> String {
    format!("{}::{}", module_name, function_name)
}

/// Result of running a single test
#[derive(Debug, Clone)]
pub enum TestOutcome {
    /// Test returned a passing value or its future became ready
    Success {
        name: String,
        assertions_passed: usize,
        residual_stack_count: usize,
        messages: Vec<String>,
    },
    /// Test failed an assertion, returned a falsy shape, or never became ready
    Failure {
        name: String,
        assertions_passed: usize,
        residual_stack_count: usize,
        reason: String,
        messages: Vec<String>,
    },
    /// Test raised an unexpected error
    Error {
        name: String,
        assertions_passed: usize,
        residual_stack_count: usize,
        cause: RuntimeError,
        messages: Vec<String>,
    },
}

impl TestOutcome {
    pub fn name(&self) -> &str {
        match self {
            TestOutcome::Success { name, .. }
            | TestOutcome::Failure { name, .. }
            | TestOutcome::Error { name, .. } => name,
        }
    }

    pub fn assertions_passed(&self) -> usize {
        match self {
            TestOutcome::Success {
                assertions_passed, ..
            }
            | TestOutcome::Failure {
                assertions_passed, ..
            }
            | TestOutcome::Error {
                assertions_passed, ..
            } => *assertions_passed,
        }
    }

    /// Call frames left open when the outcome was captured
    pub fn residual_stack_count(&self) -> usize {
        match self {
            TestOutcome::Success {
                residual_stack_count,
                ..
            }
            | TestOutcome::Failure {
                residual_stack_count,
                ..
            }
            | TestOutcome::Error {
                residual_stack_count,
                ..
            } => *residual_stack_count,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            TestOutcome::Success { messages, .. }
            | TestOutcome::Failure { messages, .. }
            | TestOutcome::Error { messages, .. } => messages,
        }
    }

    /// Display label of the variant
    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Success { .. } => "Success",
            TestOutcome::Failure { .. } => "Failure",
            TestOutcome::Error { .. } => "Error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestOutcome::Failure { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TestOutcome::Error { .. })
    }

    /// A success that also left no frames behind
    pub fn is_clean(&self) -> bool {
        self.is_success() && self.residual_stack_count() == 0
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            TestOutcome::Failure { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&RuntimeError> {
        match self {
            TestOutcome::Error { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
