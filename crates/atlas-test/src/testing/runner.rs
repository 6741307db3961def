//! Test runner - execute a single test and classify what it produced

use crate::testing::outcome::{qualified_name, TestOutcome};
use crate::testing::suite::TestFunction;
use atlas_test_runtime::{ContextSlot, ExecutionContext, RuntimeError, TestFuture, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::Poll;
use tracing::{debug, error, trace};

/// Maximum number of polls a returned future gets before it is failed
pub const MAX_POLLS: usize = 100;

/// Source of fresh execution contexts, one per test
pub trait ContextFactory {
    fn create(&self) -> ExecutionContext;
}

impl<F> ContextFactory for F
where
    F: Fn() -> ExecutionContext,
{
    fn create(&self) -> ExecutionContext {
        self()
    }
}

/// What a test run amounted to, before counters are attached
enum Verdict {
    Pass,
    Fail(String),
    Raised(RuntimeError),
}

/// Runs tests one at a time.
///
/// The runner owns the slot that holds a context while its future is being
/// polled. The slot is not `Sync`, so neither is the runner: tests driven
/// through one runner are strictly sequential.
#[derive(Debug, Default)]
pub struct TestRunner {
    slot: ContextSlot,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a context is currently installed for polling
    pub fn is_polling(&self) -> bool {
        self.slot.is_occupied()
    }

    /// Run `test` against a fresh context from `factory`.
    ///
    /// Never fails: every path, including panics in test code, produces a
    /// `TestOutcome`.
    pub fn run_test<F>(&self, module_name: &str, test: &TestFunction, factory: &F) -> TestOutcome
    where
        F: ContextFactory + ?Sized,
    {
        let name = qualified_name(module_name, &test.name);
        let mut ctx = factory.create();
        ctx.reset_timeout();
        debug!(test = %name, "running test");

        let returned = catch_panic(|| (test.body)(&mut ctx));
        let verdict = match returned {
            Ok(Value::Bool(false)) => Verdict::Fail("Returned false".to_string()),
            Ok(Value::Option(None)) => Verdict::Fail("Returned None".to_string()),
            Ok(Value::Result(Err(err))) => Verdict::Fail(format!("Returned Err({})", err)),
            Ok(Value::Future(future)) => return self.drive_future(name, &future, ctx),
            Ok(_) => Verdict::Pass,
            Err(err) => Verdict::Raised(err),
        };
        conclude(name, &mut ctx, verdict)
    }

    /// Poll `future` up to `MAX_POLLS` times with `ctx` installed in the slot
    fn drive_future(
        &self,
        name: String,
        future: &TestFuture,
        ctx: ExecutionContext,
    ) -> TestOutcome {
        let guard = match self.slot.install(ctx) {
            Ok(guard) => guard,
            Err(mut ctx) => {
                return conclude(name, &mut ctx, Verdict::Raised(RuntimeError::ContextBusy))
            }
        };

        let mut verdict = Verdict::Fail("Future did not become ready".to_string());
        for poll_count in 1..=MAX_POLLS {
            let polled = {
                let mut ctx = guard.context_mut();
                ctx.record_yield();
                ctx.reset_timeout();
                catch_panic(|| future.poll(&mut ctx))
            };
            match polled {
                Ok(Poll::Ready(_)) => {
                    trace!(test = %name, poll_count, "future ready");
                    verdict = Verdict::Pass;
                    break;
                }
                Ok(Poll::Pending) => {}
                Err(err) => {
                    verdict = Verdict::Raised(err);
                    break;
                }
            }
        }
        if matches!(verdict, Verdict::Fail(_)) {
            debug!(test = %name, polls = MAX_POLLS, "future did not become ready");
        }

        let mut ctx = guard.release();
        conclude(name, &mut ctx, verdict)
    }
}

/// Attach the context's counters and messages to a verdict
fn conclude(name: String, ctx: &mut ExecutionContext, verdict: Verdict) -> TestOutcome {
    let assertions_passed = ctx.assertions_count();
    let residual_stack_count = ctx.stack_call_count();
    let messages = ctx.take_messages();

    match verdict {
        Verdict::Pass => TestOutcome::Success {
            name,
            assertions_passed,
            residual_stack_count,
            messages,
        },
        Verdict::Fail(reason) | Verdict::Raised(RuntimeError::AssertionFailed { msg: reason }) => {
            TestOutcome::Failure {
                name,
                assertions_passed,
                residual_stack_count,
                reason,
                messages,
            }
        }
        Verdict::Raised(cause) => {
            error!(test = %name, error = %cause, "test raised an unexpected error");
            TestOutcome::Error {
                name,
                assertions_passed,
                residual_stack_count,
                cause,
                messages,
            }
        }
    }
}

/// Run `f`, turning a panic into `RuntimeError::Panic`
fn catch_panic<T>(f: impl FnOnce() -> Result<T, RuntimeError>) -> Result<T, RuntimeError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(RuntimeError::Panic {
            msg: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
