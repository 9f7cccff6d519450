#![forbid(unsafe_code)]

//! Per-container drag ownership token.
//!
//! At most one item may be dragged in a container at a time. Several
//! controllers viewing the same container share one lease through an `Arc`.
//! Every id is a valid holder, so the slot is an `Option` behind a short,
//! uncontended lock rather than an atomic word with a reserved value.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tilegrid_store::ItemId;

#[derive(Debug, Default)]
pub struct DragLease {
    holder: Mutex<Option<ItemId>>,
}

impl DragLease {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            holder: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ItemId>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the lease for `id`. While held, every claim fails with the
    /// current holder, including a second claim for the same id.
    pub fn try_acquire(&self, id: ItemId) -> Result<(), ItemId> {
        let mut slot = self.slot();
        match *slot {
            Some(current) => Err(current),
            None => {
                *slot = Some(id);
                Ok(())
            }
        }
    }

    /// Release the lease if `id` holds it. Returns whether it was released.
    pub fn release(&self, id: ItemId) -> bool {
        let mut slot = self.slot();
        if *slot == Some(id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn holder(&self) -> Option<ItemId> {
        *self.slot()
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.holder().is_some()
    }
}
