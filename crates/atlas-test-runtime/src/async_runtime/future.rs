//! Pollable future values
//!
//! A `TestFuture` is a suspended computation handed back by a test function.
//! The harness drives it by calling `poll` with the test's own execution
//! context; futures that await other futures poll them with that same
//! context, so nested suspension always resolves against the right test.

use crate::context::ExecutionContext;
use crate::value::{RuntimeError, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Poll;

type PollFn = dyn FnMut(&mut ExecutionContext) -> Result<Poll<Value>, RuntimeError> + Send;

/// Future state
#[derive(Clone)]
pub enum FutureState {
    /// Computation is in progress
    Pending,
    /// Computation completed successfully with a value
    Resolved(Value),
    /// Computation failed with an error value
    Rejected(Value),
}

impl fmt::Debug for FutureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FutureState::Pending => write!(f, "Pending"),
            FutureState::Resolved(_) => write!(f, "Resolved"),
            FutureState::Rejected(_) => write!(f, "Rejected"),
        }
    }
}

struct Inner {
    state: FutureState,
    poll_fn: Option<Box<PollFn>>,
}

/// Suspended computation
///
/// # State Machine
/// - Pending → Resolved (poll function returned `Ready`)
/// - Pending → Rejected (created rejected)
/// - Once Resolved or Rejected, state is final and every poll repeats it
#[derive(Clone)]
pub struct TestFuture {
    inner: Arc<Mutex<Inner>>,
}

impl TestFuture {
    fn with_state(state: FutureState, poll_fn: Option<Box<PollFn>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { state, poll_fn })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a future driven by a poll function
    pub fn from_fn<F>(poll_fn: F) -> Self
    where
        F: FnMut(&mut ExecutionContext) -> Result<Poll<Value>, RuntimeError> + Send + 'static,
    {
        Self::with_state(FutureState::Pending, Some(Box::new(poll_fn)))
    }

    /// Create an immediately resolved future
    pub fn ready(value: Value) -> Self {
        Self::with_state(FutureState::Resolved(value), None)
    }

    /// Create an immediately rejected future
    pub fn rejected(error: Value) -> Self {
        Self::with_state(FutureState::Rejected(error), None)
    }

    /// Create a future that never becomes ready
    pub fn pending() -> Self {
        Self::with_state(FutureState::Pending, None)
    }

    /// Create a future that reports ready on its `polls`-th poll
    pub fn ready_after(polls: usize, value: Value) -> Self {
        let mut seen = 0;
        Self::from_fn(move |_| {
            seen += 1;
            if seen >= polls {
                Ok(Poll::Ready(value.clone()))
            } else {
                Ok(Poll::Pending)
            }
        })
    }

    /// Await this future, then run `handler` with its value.
    ///
    /// The handler receives the context the outer future is polled with.
    pub fn then<F>(self, handler: F) -> Self
    where
        F: FnOnce(&mut ExecutionContext, Value) -> Result<Value, RuntimeError> + Send + 'static,
    {
        let mut handler = Some(handler);
        Self::from_fn(move |ctx| match self.poll(ctx)? {
            Poll::Pending => Ok(Poll::Pending),
            Poll::Ready(value) => match handler.take() {
                Some(handler) => handler(ctx, value).map(Poll::Ready),
                None => Ok(Poll::Ready(value)),
            },
        })
    }

    /// Poll once against `ctx`
    pub fn poll(&self, ctx: &mut ExecutionContext) -> Result<Poll<Value>, RuntimeError> {
        let mut poll_fn = {
            let mut inner = self.lock();
            match &inner.state {
                FutureState::Resolved(value) => return Ok(Poll::Ready(value.clone())),
                FutureState::Rejected(error) => {
                    return Err(RuntimeError::Thrown {
                        value: error.clone(),
                    })
                }
                FutureState::Pending => {}
            }
            match inner.poll_fn.take() {
                Some(poll_fn) => poll_fn,
                None => return Ok(Poll::Pending),
            }
        };

        // The lock is released while user code runs
        let result = poll_fn(ctx);

        let mut inner = self.lock();
        match &result {
            Ok(Poll::Ready(value)) => inner.state = FutureState::Resolved(value.clone()),
            _ => inner.poll_fn = Some(poll_fn),
        }
        result
    }

    pub fn state(&self) -> FutureState {
        self.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lock().state, FutureState::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.lock().state, FutureState::Resolved(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.lock().state, FutureState::Rejected(_))
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TestFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Future({:?})", self.lock().state)
    }
}

impl fmt::Display for TestFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lock().state {
            FutureState::Pending => write!(f, "Future(pending)"),
            FutureState::Resolved(_) => write!(f, "Future(resolved)"),
            FutureState::Rejected(_) => write!(f, "Future(rejected)"),
        }
    }
}
