//! Test suites - modules of test functions and the loops that run them

use crate::testing::outcome::qualified_name;
use crate::testing::reporter::Reporter;
use crate::testing::runner::{ContextFactory, TestRunner};
use atlas_test_runtime::{ExecutionContext, RuntimeError, Value};
use std::fmt;
use std::sync::Arc;

/// Body of a test function
pub type TestFn = Arc<dyn Fn(&mut ExecutionContext) -> Result<Value, RuntimeError> + Send + Sync>;

/// A named test function
#[derive(Clone)]
pub struct TestFunction {
    /// Name of the test function (e.g., "test_addition")
    pub name: String,
    /// Code to run
    pub body: TestFn,
}

impl TestFunction {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ExecutionContext) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }
}

impl fmt::Debug for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A module and its test functions, in declaration order
#[derive(Debug, Clone)]
pub struct TestModule {
    pub name: String,
    pub tests: Vec<TestFunction>,
}

impl TestModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Append a test function
    pub fn test<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ExecutionContext) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.tests.push(TestFunction::new(name, body));
        self
    }
}

/// Ordered collection of modules
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    pub modules: Vec<TestModule>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: TestModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Keep only tests whose `module::function` name contains `pattern`.
    ///
    /// Modules are kept even when nothing in them matches.
    pub fn filter(&self, pattern: &str) -> Self {
        let modules = self
            .modules
            .iter()
            .map(|module| TestModule {
                name: module.name.clone(),
                tests: module
                    .tests
                    .iter()
                    .filter(|t| qualified_name(&module.name, &t.name).contains(pattern))
                    .cloned()
                    .collect(),
            })
            .collect();

        TestRegistry { modules }
    }

    /// Total number of test functions
    pub fn len(&self) -> usize {
        self.modules.iter().map(|m| m.tests.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run every test of `module` in order, reporting each outcome as it lands.
///
/// A module without tests produces no reporter callbacks at all.
pub fn run_module<R, F>(runner: &TestRunner, module: &TestModule, reporter: &mut R, factory: &F)
where
    R: Reporter + ?Sized,
    F: ContextFactory + ?Sized,
{
    if module.tests.is_empty() {
        return;
    }

    reporter.begin_module(&module.name);
    for test in &module.tests {
        let outcome = runner.run_test(&module.name, test, factory);
        reporter.report(outcome);
    }
    reporter.end_module(&module.name);
}

/// Run every module of `registry` in order
pub fn run_suite<R, F>(runner: &TestRunner, registry: &TestRegistry, reporter: &mut R, factory: &F)
where
    R: Reporter + ?Sized,
    F: ContextFactory + ?Sized,
{
    for module in &registry.modules {
        run_module(runner, module, reporter, factory);
    }
}
