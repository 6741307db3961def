//! Cooperative async support for test code
//!
//! - `TestFuture`: a pollable suspended computation
//! - `ContextSlot`: the single-occupant slot holding the context being polled

pub mod future;
pub mod slot;

pub use future::{FutureState, TestFuture};
pub use slot::{ContextSlot, SlotGuard};
