//! Atlas test harness
//!
//! Executes Atlas test functions and reports a suite verdict:
//! - `testing::runner`: one test in, one `TestOutcome` out
//! - `testing::suite`: modules and registries run in order
//! - `testing::reporter`: outcome lines and the pass/fail aggregate
//! - `config`: harness settings from `atlas.toml` and the environment

pub mod config;
pub mod testing;

pub use config::{ConfigError, ConfigResult, HarnessConfig};
pub use testing::{
    run_module, run_suite, ContextFactory, LineSink, Reporter, StdoutSink, SuiteAggregate,
    TestFunction, TestModule, TestOutcome, TestRegistry, TestReporter, TestRunner, MAX_POLLS,
};
