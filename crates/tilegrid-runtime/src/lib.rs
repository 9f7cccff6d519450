#![forbid(unsafe_code)]

//! Runtime: drag sessions, grid controllers, and the board coordinator.
//!
//! # Role in tilegrid
//! `tilegrid-runtime` is where gestures become commits. A
//! [`controller::GridController`] per visible container consumes pointer
//! input, runs a [`session::DragSession`] for the held tile, and writes the
//! single resulting mutation through the shared store when the pointer lifts.
//!
//! # Primary responsibilities
//! - **Sessions**: per-frame hover/reorder/outside evaluation with no store
//!   writes.
//! - **Controllers**: hold recognition, lease arbitration, commit and cancel.
//! - **Board**: the main grid plus one open folder, including the drag-out
//!   exit flow.
//! - **Events**: [`event::GridEvent`] batches and the [`event::GridObserver`]
//!   callback adapter.
//!
//! # Logging
//! Targets `tilegrid.drag` (per-frame, `trace`) and `tilegrid.controller`
//! (holds, conflicts, and the `drag.commit` span).

pub mod board;
pub mod controller;
pub mod event;
pub mod lease;
pub mod session;

pub use board::{Board, FolderLayout};
pub use controller::{ExitPolicy, GridController};
pub use event::{GridEvent, GridObserver, dispatch_all};
pub use lease::DragLease;
pub use session::{
    CommitPlan, DragEffect, DragNoopReason, DragSession, DragState, DragTransition, FrameContext,
    OutsideBounds,
};
