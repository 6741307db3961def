//! Test reporter - print outcomes and aggregate the suite verdict

use crate::config::HarnessConfig;
use crate::testing::outcome::TestOutcome;
use colored::*;

/// Destination for report lines
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

/// Prints lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Captures lines in memory
impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Callbacks driven by the suite orchestrator
pub trait Reporter {
    /// Called before the first test of a non-empty module
    fn begin_module(&mut self, name: &str);

    /// Called after the last test of a non-empty module
    fn end_module(&mut self, name: &str);

    /// Called once per test, in run order
    fn report(&mut self, outcome: TestOutcome);
}

/// Failures and errors collected over one suite run
#[derive(Debug, Clone, Default)]
pub struct SuiteAggregate {
    /// Outcomes labelled `Failure`, in report order
    pub failures: Vec<TestOutcome>,
    /// Outcomes labelled `Error`, plus successes that leaked stack frames
    pub errors: Vec<TestOutcome>,
    /// Number of clean successes
    pub passed: usize,
}

impl SuiteAggregate {
    /// Add one outcome.
    ///
    /// A success that left call frames open still counts against the suite:
    /// it lands in `errors` even though its label stays `Success`.
    pub fn record(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Failure { .. } => self.failures.push(outcome),
            TestOutcome::Error { .. } => self.errors.push(outcome),
            TestOutcome::Success { .. } if !outcome.is_clean() => self.errors.push(outcome),
            TestOutcome::Success { .. } => self.passed += 1,
        }
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.was_successful() {
            0
        } else {
            1
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failures.len() + self.errors.len()
    }
}

/// Per-module tallies, reset by `begin_module`
#[derive(Debug, Default, Clone, Copy)]
struct ModuleTally {
    passed: usize,
    failed: usize,
    errored: usize,
}

/// Console reporter writing through a `LineSink`
pub struct TestReporter<S: LineSink = StdoutSink> {
    sink: S,
    /// Column the test name is padded to
    name_width: usize,
    /// Colorize labels
    color: bool,
    aggregate: SuiteAggregate,
    module: ModuleTally,
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(StdoutSink)
    }
}

impl<S: LineSink> TestReporter<S> {
    /// Create a reporter with default settings
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, &HarnessConfig::default())
    }

    pub fn with_config(sink: S, config: &HarnessConfig) -> Self {
        Self {
            sink,
            name_width: config.name_width,
            color: config.color,
            aggregate: SuiteAggregate::default(),
            module: ModuleTally::default(),
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.color = !no_color;
        self
    }

    pub fn was_successful(&self) -> bool {
        self.aggregate.was_successful()
    }

    pub fn failures(&self) -> &[TestOutcome] {
        &self.aggregate.failures
    }

    pub fn errors(&self) -> &[TestOutcome] {
        &self.aggregate.errors
    }

    pub fn aggregate(&self) -> &SuiteAggregate {
        &self.aggregate
    }

    pub fn exit_code(&self) -> i32 {
        self.aggregate.exit_code()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the reporter, keeping the sink and the aggregate
    pub fn into_parts(self) -> (S, SuiteAggregate) {
        (self.sink, self.aggregate)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn label(&self, outcome: &TestOutcome) -> String {
        let color = match outcome {
            TestOutcome::Success { .. } => Color::Green,
            TestOutcome::Failure { .. } => Color::Red,
            TestOutcome::Error { .. } => Color::Yellow,
        };
        self.paint(outcome.label(), color)
    }

    /// Print the suite summary and the details of every failure and error
    pub fn finish(&mut self) {
        let failed = self.aggregate.failures.len();
        let errored = self.aggregate.errors.len();
        let status = if self.aggregate.was_successful() {
            self.paint("PASSED", Color::Green)
        } else {
            self.paint("FAILED", Color::Red)
        };

        self.sink.write_line(&"─".repeat(50));
        let summary = format!(
            "Test result: {} | {} total, {} passed, {} failed, {} errors",
            status,
            self.aggregate.total(),
            self.aggregate.passed,
            failed,
            errored
        );
        self.sink.write_line(&summary);

        let mut details = Vec::new();
        for outcome in &self.aggregate.failures {
            details.push(format!("  ● {}", outcome.name()));
            if let Some(reason) = outcome.reason() {
                for line in reason.lines() {
                    details.push(format!("      {}", line));
                }
            }
        }
        for outcome in &self.aggregate.errors {
            details.push(format!("  ● {}", outcome.name()));
            match outcome.cause() {
                Some(cause) => details.push(format!("      {}", cause)),
                None => details.push(format!(
                    "      leaked {} stack frame(s)",
                    outcome.residual_stack_count()
                )),
            }
        }
        if !details.is_empty() {
            let heading = self.paint("Failures:", Color::Red);
            self.sink.write_line("");
            self.sink.write_line(&heading);
            for line in details {
                self.sink.write_line(&line);
            }
        }
    }
}

impl<S: LineSink> Reporter for TestReporter<S> {
    fn begin_module(&mut self, name: &str) {
        self.module = ModuleTally::default();
        self.sink.write_line(&format!("module {}", name));
    }

    fn end_module(&mut self, name: &str) {
        let tally = self.module;
        self.sink.write_line(&format!(
            "{}: {} passed, {} failed, {} errors",
            name, tally.passed, tally.failed, tally.errored
        ));
        self.sink.write_line("");
    }

    fn report(&mut self, outcome: TestOutcome) {
        for message in outcome.messages() {
            self.sink.write_line(message);
        }
        let line = format!(
            "{:<width$} {} ({})",
            outcome.name(),
            self.label(&outcome),
            outcome.assertions_passed(),
            width = self.name_width
        );
        self.sink.write_line(&line);

        match &outcome {
            TestOutcome::Failure { .. } => self.module.failed += 1,
            TestOutcome::Error { .. } => self.module.errored += 1,
            TestOutcome::Success { .. } if !outcome.is_clean() => self.module.errored += 1,
            TestOutcome::Success { .. } => self.module.passed += 1,
        }
        self.aggregate.record(outcome);
    }
}
