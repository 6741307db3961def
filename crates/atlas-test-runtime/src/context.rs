//! Per-test execution context
//!
//! Each test runs against its own `ExecutionContext`, which tracks:
//! - How many assertions have passed (`assertions_count`)
//! - Which call frames are still open (`stack_call_count`)
//! - How many times the harness has polled a future (`yield_count`)
//! - A timeout tracker the harness resets and test code checks
//! - Diagnostic lines printed by the test

use crate::value::RuntimeError;
use std::time::{Duration, Instant};

/// Default per-test time budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Call frame opened by `enter_frame`
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Function name (for debugging and error messages)
    pub function_name: String,
}

/// Deadline tracker
///
/// The harness resets it once per invocation and once per poll; enforcement
/// happens when test code calls `check`.
#[derive(Debug, Clone)]
pub struct TimeoutTracker {
    budget: Duration,
    started: Instant,
}

impl TimeoutTracker {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            started: Instant::now(),
        }
    }

    /// Restart the budget from now
    pub fn reset(&mut self) {
        self.started = Instant::now();
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.budget
    }

    /// Raise `Timeout` once the budget is spent
    pub fn check(&self) -> Result<(), RuntimeError> {
        if self.is_expired() {
            return Err(RuntimeError::Timeout {
                elapsed_ms: self.elapsed().as_millis(),
            });
        }
        Ok(())
    }
}

/// Mutable state for a single test run
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    assertions: usize,
    frames: Vec<CallFrame>,
    yields: usize,
    timeout: TimeoutTracker,
    messages: Vec<String>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    /// Create a context with the default time budget
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a context with a custom time budget
    pub fn with_timeout(budget: Duration) -> Self {
        Self {
            assertions: 0,
            frames: Vec::new(),
            yields: 0,
            timeout: TimeoutTracker::new(budget),
            messages: Vec::new(),
        }
    }

    pub fn assertions_count(&self) -> usize {
        self.assertions
    }

    /// Number of call frames that have not been popped
    pub fn stack_call_count(&self) -> usize {
        self.frames.len()
    }

    pub fn yield_count(&self) -> usize {
        self.yields
    }

    pub fn timeout(&self) -> &TimeoutTracker {
        &self.timeout
    }

    pub fn reset_timeout(&mut self) {
        self.timeout.reset();
    }

    /// Raise `Timeout` if the budget since the last reset is spent
    pub fn check_timeout(&self) -> Result<(), RuntimeError> {
        self.timeout.check()
    }

    pub fn record_assertion(&mut self) {
        self.assertions += 1;
    }

    pub fn record_yield(&mut self) {
        self.yields += 1;
    }

    pub fn enter_frame(&mut self, function_name: impl Into<String>) {
        self.frames.push(CallFrame {
            function_name: function_name.into(),
        });
    }

    pub fn exit_frame(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    /// Innermost open frame
    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Run `f` inside a named call frame.
    ///
    /// The frame is popped only when `f` returns `Ok`. An error unwinds past
    /// it and leaves the frame open, so it shows up in the residual stack
    /// count of the test outcome.
    pub fn call<T>(
        &mut self,
        function_name: impl Into<String>,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        self.enter_frame(function_name);
        let value = f(self)?;
        self.exit_frame();
        Ok(value)
    }

    /// Append a diagnostic line
    pub fn print(&mut self, line: impl Into<String>) {
        self.messages.push(line.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Move the diagnostic lines out, leaving the context with none
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}
