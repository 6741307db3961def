//! Test harness for Atlas
//!
//! Runs test functions, classifies what they return, drives returned
//! futures, and rolls outcomes up into a suite verdict.

pub mod outcome;
pub mod reporter;
pub mod runner;
pub mod suite;

pub use outcome::{qualified_name, TestOutcome};
pub use reporter::{LineSink, Reporter, StdoutSink, SuiteAggregate, TestReporter};
pub use runner::{ContextFactory, TestRunner, MAX_POLLS};
pub use suite::{run_module, run_suite, TestFunction, TestModule, TestRegistry};
