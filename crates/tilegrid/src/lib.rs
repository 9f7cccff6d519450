#![forbid(unsafe_code)]

//! tilegrid public facade crate.
//!
//! Re-exports the types a host needs to put a drag-to-reorder, drop-to-nest
//! tile grid on screen, plus a prelude for day-to-day use. The layered crates
//! stay reachable as modules for anything more specialised.
//!
//! ```rust,ignore
//! use tilegrid::prelude::*;
//!
//! let main = GridGeometry::fit(390.0, 100.0, 100.0, 8.0, 0.0)?;
//! let folder = FolderLayout { geometry: main, container_height: 480.0 };
//! let mut board = Board::new(OrderStore::from_items(items)?, main, folder, EngineConfig::default())?;
//!
//! for event in board.process_main(&pointer) {
//!     // render, play haptics, lock scrolling, ...
//! }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use tilegrid_core::{
    ConfigError, EngineConfig, HoldConfig, HoldRecognizer, HoldSignal, Point, PointerEvent,
    PointerPhase, Rect,
};

// --- Layout re-exports -----------------------------------------------------

pub use tilegrid_layout::{Cell, CellCandidates, GridGeometry, LayoutError, PageView};

// --- Store re-exports ------------------------------------------------------

pub use tilegrid_store::{
    BoardSnapshot, Container, ContainerId, FolderMergePolicy, Item, ItemId, MergeDecision,
    MergeOutcome, MergeRejection, MergeRequest, NestingLimitPolicy, Order, OrderStore,
    OrderViolation, SharedStore, StoreError,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tilegrid_runtime::{
    Board, CommitPlan, DragEffect, DragLease, DragNoopReason, DragState, DragTransition,
    ExitPolicy, FolderLayout, GridController, GridEvent, GridObserver, dispatch_all,
};

// --- Errors ---------------------------------------------------------------

/// Any error a tilegrid host can run into while setting up or mutating a
/// board.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Board, ContainerId, EngineConfig, Error, FolderLayout, GridController, GridEvent,
        GridGeometry, GridObserver, Item, ItemId, Order, OrderStore, Point, PointerEvent, Result,
    };

    pub use crate::{core, layout, runtime, store};
}

pub use tilegrid_core as core;
pub use tilegrid_layout as layout;
pub use tilegrid_runtime as runtime;
pub use tilegrid_store as store;
