#![forbid(unsafe_code)]

//! Shared board handle with wait-free reads and atomic commits.
//!
//! Readers call [`SharedStore::load`] every frame and get an immutable
//! snapshot; they never block and never see a half-applied mutation.
//! Writers go through [`SharedStore::update`], which serializes on a writer
//! lock, edits a private clone, validates it, and publishes it with one
//! pointer swap.
//!
//! # Failure Modes
//!
//! - A closure that returns `Err` publishes nothing.
//! - A closure that returns `Ok` but leaves the board invalid is rolled back
//!   and reported as the validation error.
//! - A panicking writer poisons nothing observable: the writer lock is only a
//!   turnstile, so the next writer recovers it.

use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::board::OrderStore;
use crate::error::StoreError;

/// One published version of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Incremented on every successful commit.
    pub revision: u64,
    pub board: OrderStore,
}

impl Deref for BoardSnapshot {
    type Target = OrderStore;

    fn deref(&self) -> &OrderStore {
        &self.board
    }
}

pub struct SharedStore {
    current: ArcSwap<BoardSnapshot>,
    writer: Mutex<()>,
}

impl SharedStore {
    /// Publish `board` as revision 0. The board must already be valid.
    pub fn new(board: OrderStore) -> Result<Self, StoreError> {
        board.validate()?;
        Ok(Self {
            current: ArcSwap::from_pointee(BoardSnapshot { revision: 0, board }),
            writer: Mutex::new(()),
        })
    }

    /// Current snapshot. Wait-free.
    #[inline]
    #[must_use]
    pub fn load(&self) -> Arc<BoardSnapshot> {
        self.current.load_full()
    }

    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.current.load().revision
    }

    /// Apply `edit` to a copy of the board and publish it if the result
    /// validates.
    pub fn update<T>(
        &self,
        edit: impl FnOnce(&mut OrderStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _turn = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.current.load_full();
        let mut draft = base.board.clone();

        let outcome = edit(&mut draft).and_then(|value| draft.validate().map(|()| value));
        match outcome {
            Ok(value) => {
                let revision = base.revision + 1;
                self.current.store(Arc::new(BoardSnapshot {
                    revision,
                    board: draft,
                }));
                tracing::debug!(target: "tilegrid.store", revision, "board committed");
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(
                    target: "tilegrid.store",
                    revision = base.revision,
                    %error,
                    "mutation rejected"
                );
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::item::{ContainerId, Item, ItemId};

    fn store(ids: &[u64]) -> SharedStore {
        let board = OrderStore::from_items(ids.iter().map(|&id| Item::tile(id, "t")).collect())
            .expect("valid board");
        SharedStore::new(board).expect("valid store")
    }

    #[test]
    fn commit_bumps_revision() {
        let shared = store(&[1, 2, 3]);
        assert_eq!(shared.revision(), 0);
        shared
            .update(|board| board.move_within(ContainerId::Main, ItemId(3), 0))
            .expect("move");
        let snapshot = shared.load();
        assert_eq!(snapshot.revision, 1);
        assert_eq!(*snapshot.main().order(), [3, 1, 2]);
    }

    #[test]
    fn failed_edit_publishes_nothing() {
        let shared = store(&[1, 2]);
        let before = shared.load();
        let err = shared
            .update(|board| {
                board.move_within(ContainerId::Main, ItemId(1), 1)?;
                board.move_within(ContainerId::Main, ItemId(9), 0)
            })
            .expect_err("unknown item");
        assert_eq!(err, StoreError::UnknownItem(ItemId(9)));
        assert!(Arc::ptr_eq(&before, &shared.load()));
        assert_eq!(shared.revision(), 0);
    }

    #[test]
    fn old_snapshots_stay_intact() {
        let shared = store(&[1, 2, 3]);
        let old = shared.load();
        shared
            .update(|board| board.delete_item(ContainerId::Main, ItemId(2)).map(|_| ()))
            .expect("delete");
        assert_eq!(*old.main().order(), [1, 2, 3]);
        assert_eq!(*shared.load().main().order(), [1, 3]);
    }

    #[test]
    fn concurrent_writers_serialize() {
        let shared = Arc::new(store(&[1, 2, 3, 4]));
        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let shared = Arc::clone(&shared);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for round in 0..25 {
                        let id = ItemId(1 + (i + round) % 4);
                        shared
                            .update(|board| board.move_within(ContainerId::Main, id, 0))
                            .expect("move");
                        let snapshot = shared.load();
                        assert_eq!(snapshot.main().len(), 4);
                        assert_eq!(snapshot.validate(), Ok(()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }
        assert_eq!(shared.revision(), 100);
    }

    #[test]
    fn snapshot_serializes() {
        let shared = store(&[1, 2]);
        let json = serde_json::to_string(&*shared.load()).expect("serialize");
        let back: BoardSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, *shared.load());
    }
}
