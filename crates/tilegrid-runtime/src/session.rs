#![forbid(unsafe_code)]

//! Drag session state machine.
//!
//! A [`DragSession`] exists only while one tile is held. It owns the tile's
//! live rect, a private working copy of the container order that reflows as
//! the tile moves, the current hover target, and the outside flag. Nothing
//! here touches the shared store: when the pointer lifts, [`DragSession::finish`]
//! turns the final state into exactly one [`CommitPlan`].
//!
//! # State Machine
//!
//! ```text
//! Idle -> Pending -> Held -> { Reordering | Hovering | Outside } -> Idle
//!            \-> Idle (tap or move beyond tolerance)
//! ```
//!
//! Every frame re-evaluates the tile from scratch:
//!
//! 1. Live rect = start rect translated by the pointer's travel.
//! 2. With outside detection enabled, a top edge above `-top_margin` or below
//!    `container_height - bottom_margin` makes the tile a removal candidate.
//!    Hover is cleared and the order is left alone.
//! 3. Otherwise the edge-biased and center cells are computed against the
//!    working order. If they agree the tile is re-spliced at that position.
//!    If they disagree the item under the center cell becomes the hover
//!    target when the merge policy allows it.
//!
//! # Invariants
//!
//! 1. The working order is always a permutation of the order the session
//!    started from.
//! 2. `hover_target` is never the dragged item and is `None` while outside.
//! 3. `finish` yields exactly one of remove, merge, or reorder.

use serde::{Deserialize, Serialize};
use tilegrid_core::geometry::{Point, Rect};
use tilegrid_layout::GridGeometry;
use tilegrid_store::{ItemId, Order};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Lifecycle state of a container's drag machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    /// Pointer is down on a tile, long-press threshold not yet reached.
    Pending,
    /// Long-press fired; the tile has not yet picked a slot or target.
    Held,
    /// Tile sits squarely over a slot and the order reflows around it.
    Reordering,
    /// Tile straddles a neighbour that would absorb it on release.
    Hovering { target: ItemId },
    /// Tile left the container's vertical bounds.
    Outside,
}

impl DragState {
    /// Whether a session is live (Held or any of its sub-states).
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::Held | Self::Reordering | Self::Hovering { .. } | Self::Outside
        )
    }
}

/// Explicit diagnostics for steps that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    TargetMismatch,
    UnknownTarget,
    ThresholdNotReached,
    /// The tile moved but stayed within the hysteresis band of its cell.
    BelowHysteresis,
}

/// What was committed when a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum CommitPlan {
    /// Tile was released outside: take it out of the container.
    Remove,
    /// Tile was released over `host`: merge into it.
    Merge { host: ItemId },
    /// Tile lands at order position `to`.
    Reorder { to: usize },
}

/// Effect of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Pressed { item: ItemId },
    Tapped { item: ItemId },
    HoldAborted { item: ItemId },
    Held { item: ItemId, origin_index: usize },
    Reordered { from: usize, to: usize },
    HoverChanged { target: Option<ItemId> },
    LeftBounds,
    ReenteredBounds,
    Committed { plan: CommitPlan },
    CommitFailed { plan: CommitPlan },
    Canceled { item: ItemId },
    Noop { reason: DragNoopReason },
}

/// One step with monotonic telemetry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Vertical band outside of which a tile becomes a removal candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutsideBounds {
    pub top_margin: f32,
    pub container_height: f32,
    pub bottom_margin: f32,
}

impl OutsideBounds {
    #[must_use]
    pub const fn new(top_margin: f32, container_height: f32, bottom_margin: f32) -> Self {
        Self {
            top_margin,
            container_height,
            bottom_margin,
        }
    }

    /// Whether a tile whose top edge is at `y` is outside.
    #[inline]
    #[must_use]
    pub fn is_outside(&self, y: f32) -> bool {
        y < -self.top_margin || y > self.container_height - self.bottom_margin
    }
}

/// Per-frame inputs the session does not own.
pub struct FrameContext<'a> {
    pub geometry: &'a GridGeometry,
    pub tolerance: f32,
    pub bounds: Option<OutsideBounds>,
    /// Whether the policy would let the dragged tile merge into `host`.
    pub merge_allowed: &'a dyn Fn(ItemId) -> bool,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    dragged: ItemId,
    pointer_id: Option<u32>,
    state: DragState,
    origin_index: usize,
    start_pointer: Point,
    start_rect: Rect,
    live_rect: Rect,
    working_order: Order,
}

impl DragSession {
    /// Start a session for `dragged`, currently at `origin_index` in `order`.
    ///
    /// Returns `None` when `dragged` is not in `order`.
    #[must_use]
    pub fn begin(
        dragged: ItemId,
        pointer_id: Option<u32>,
        at: Point,
        order: &Order,
        geometry: &GridGeometry,
    ) -> Option<Self> {
        let origin_index = order.position(dragged)?;
        let start_rect = geometry.position_of(origin_index);
        Some(Self {
            dragged,
            pointer_id,
            state: DragState::Held,
            origin_index,
            start_pointer: at,
            start_rect,
            live_rect: start_rect,
            working_order: order.clone(),
        })
    }

    #[inline]
    #[must_use]
    pub fn dragged(&self) -> ItemId {
        self.dragged
    }

    #[inline]
    #[must_use]
    pub fn pointer_id(&self) -> Option<u32> {
        self.pointer_id
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn origin_index(&self) -> usize {
        self.origin_index
    }

    #[inline]
    #[must_use]
    pub fn live_rect(&self) -> Rect {
        self.live_rect
    }

    #[inline]
    #[must_use]
    pub fn working_order(&self) -> &Order {
        &self.working_order
    }

    #[must_use]
    pub fn hover_target(&self) -> Option<ItemId> {
        match self.state {
            DragState::Hovering { target } => Some(target),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_outside(&self) -> bool {
        self.state == DragState::Outside
    }

    /// Current position of the dragged tile in the working order.
    #[must_use]
    pub fn working_index(&self) -> usize {
        self.working_order
            .position(self.dragged)
            .unwrap_or(self.origin_index)
    }

    /// Re-evaluate the session for a pointer at `pointer`.
    ///
    /// Returns the state the session moved to and what changed. Only the
    /// session's own fields are touched.
    pub fn update(&mut self, pointer: Point, ctx: &FrameContext<'_>) -> (DragState, DragEffect) {
        let previous = self.state;
        let (dx, dy) = pointer.delta_from(self.start_pointer);
        self.live_rect = self.start_rect.translate(dx, dy);

        if ctx
            .bounds
            .is_some_and(|bounds| bounds.is_outside(self.live_rect.y))
        {
            self.state = DragState::Outside;
            let effect = if previous == DragState::Outside {
                DragEffect::Noop {
                    reason: DragNoopReason::BelowHysteresis,
                }
            } else {
                DragEffect::LeftBounds
            };
            return (self.state, effect);
        }

        let len = self.working_order.len();
        let candidates =
            ctx.geometry
                .cell_candidates(self.live_rect.origin(), (dx, dy), len, ctx.tolerance);

        let mut reordered = None;
        if candidates.agree() {
            let from = self.working_index();
            let wanted = ctx.geometry.order_position_from_cell(candidates.edge, len);
            if let Some(to) = self.working_order.move_within(self.dragged, wanted)
                && to != from
            {
                reordered = Some((from, to));
            }
            self.state = DragState::Reordering;
        } else {
            let target = ctx
                .geometry
                .index_of_cell(candidates.center)
                .and_then(|index| self.working_order.get(index))
                .filter(|&id| id != self.dragged && (ctx.merge_allowed)(id));
            self.state = match target {
                Some(target) => DragState::Hovering { target },
                None => DragState::Held,
            };
        }

        let hover_before = match previous {
            DragState::Hovering { target } => Some(target),
            _ => None,
        };
        let effect = if let Some((from, to)) = reordered {
            DragEffect::Reordered { from, to }
        } else if hover_before != self.hover_target() {
            DragEffect::HoverChanged {
                target: self.hover_target(),
            }
        } else if previous == DragState::Outside {
            DragEffect::ReenteredBounds
        } else {
            DragEffect::Noop {
                reason: DragNoopReason::BelowHysteresis,
            }
        };
        (self.state, effect)
    }

    /// End the session and decide its single commit.
    #[must_use]
    pub fn finish(self) -> CommitPlan {
        match self.state {
            DragState::Outside => CommitPlan::Remove,
            DragState::Hovering { target } => CommitPlan::Merge { host: target },
            _ => CommitPlan::Reorder {
                to: self.working_index(),
            },
        }
    }
}
