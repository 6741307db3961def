//! Single-occupant "current context" slot
//!
//! While a future is being driven, its execution context lives in a
//! `ContextSlot`. At most one context can occupy a slot at a time, and the
//! `SlotGuard` returned by `install` empties the slot when it is released
//! or dropped, whichever happens first.
//!
//! The slot is a `RefCell`, so it cannot be shared across threads.

use crate::context::ExecutionContext;
use std::cell::{RefCell, RefMut};

#[derive(Debug, Default)]
pub struct ContextSlot {
    occupant: RefCell<Option<ExecutionContext>>,
}

impl ContextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `ctx` into the slot.
    ///
    /// If another context is already installed the occupant is left alone
    /// and `ctx` is handed back as the error.
    pub fn install(&self, ctx: ExecutionContext) -> Result<SlotGuard<'_>, ExecutionContext> {
        let mut occupant = match self.occupant.try_borrow_mut() {
            Ok(occupant) => occupant,
            Err(_) => return Err(ctx),
        };
        if occupant.is_some() {
            return Err(ctx);
        }
        *occupant = Some(ctx);
        Ok(SlotGuard {
            slot: self,
            released: false,
        })
    }

    pub fn is_occupied(&self) -> bool {
        match self.occupant.try_borrow() {
            Ok(occupant) => occupant.is_some(),
            // Borrowed mutably means a guard is using it
            Err(_) => true,
        }
    }
}

/// Scoped occupancy of a `ContextSlot`
#[derive(Debug)]
pub struct SlotGuard<'a> {
    slot: &'a ContextSlot,
    released: bool,
}

impl SlotGuard<'_> {
    /// Mutable access to the installed context.
    ///
    /// The returned borrow must be dropped before calling this again.
    pub fn context_mut(&self) -> RefMut<'_, ExecutionContext> {
        RefMut::map(self.slot.occupant.borrow_mut(), |occupant| {
            occupant.get_or_insert_with(ExecutionContext::new)
        })
    }

    /// Empty the slot and hand the context back
    pub fn release(mut self) -> ExecutionContext {
        self.released = true;
        self.slot
            .occupant
            .borrow_mut()
            .take()
            .unwrap_or_default()
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            if let Ok(mut occupant) = self.slot.occupant.try_borrow_mut() {
                occupant.take();
            }
        }
    }
}
