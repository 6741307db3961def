//! Atlas test runtime - collaborators for the test harness
//!
//! This library provides the runtime surface the harness drives:
//! - Values returned by test functions
//! - Per-test execution contexts and their counters
//! - Pollable futures and the single-occupant context slot
//! - Assertion primitives

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod async_runtime;
pub mod context;
pub mod stdlib;
pub mod value;

pub use async_runtime::{ContextSlot, FutureState, SlotGuard, TestFuture};
pub use context::{CallFrame, ExecutionContext, TimeoutTracker};
pub use value::{RuntimeError, Value};
