#![forbid(unsafe_code)]

//! Item collection and ordering for tilegrid.
//!
//! # Role
//!
//! Owns the canonical board: every container's item set and visual order,
//! plus the folder merge policy that decides how a dropped tile nests. Drag
//! sessions never mutate this state directly; they produce a plan that the
//! controller commits through [`SharedStore::update`].
//!
//! # Layout
//!
//! - [`item`]: ids, items, container addressing
//! - [`order`]: pure id-sequence edits
//! - [`container`]: one grid's items plus order
//! - [`board`]: the [`OrderStore`] tree and its mutations
//! - [`merge`]: [`FolderMergePolicy`] and the default depth-limited policy
//! - [`shared`]: wait-free read handle with atomic commits

pub mod board;
pub mod container;
pub mod error;
pub mod item;
pub mod merge;
pub mod order;
pub mod shared;

pub use board::{MergeOutcome, OrderStore};
pub use container::Container;
pub use error::{OrderViolation, StoreError};
pub use item::{ContainerId, Item, ItemId};
pub use merge::{FolderMergePolicy, MergeDecision, MergeRejection, MergeRequest, NestingLimitPolicy};
pub use order::Order;
pub use shared::{BoardSnapshot, SharedStore};
