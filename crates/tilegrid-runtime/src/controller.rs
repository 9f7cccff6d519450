#![forbid(unsafe_code)]

//! Grid controller: one container's gesture surface.
//!
//! # Role
//!
//! Glues the hold recognizer, the geometry mapper, a drag session, and the
//! shared store together for a single container (the main grid or one
//! folder). Hosts either feed raw pointer events through
//! [`GridController::process`] and [`GridController::tick`], or drive the
//! gesture callbacks directly ([`GridController::on_gesture_start`] and
//! friends) when their platform already recognizes long presses.
//!
//! # Invariants
//!
//! 1. At most one session per controller, and at most one per container
//!    across controllers sharing a [`DragLease`].
//! 2. Per-frame calls never write to the store.
//! 3. A release commits exactly one of remove, merge, or reorder through one
//!    [`SharedStore::update`]; a cancel commits nothing.
//! 4. Every session end restores scrolling (`ScrollLock(false)`).
//!
//! # Failure Modes
//!
//! A commit that the store rejects is logged, reported as
//! [`GridEvent::CommitFailed`], and leaves the board as it was. The session is
//! destroyed either way.

use std::collections::BTreeMap;
use std::sync::Arc;

use tilegrid_core::event::{PointerEvent, PointerPhase};
use tilegrid_core::geometry::{Point, Rect};
use tilegrid_core::gesture::{HoldRecognizer, HoldSignal};
use tilegrid_core::EngineConfig;
use tilegrid_layout::GridGeometry;
use tilegrid_store::{
    ContainerId, FolderMergePolicy, ItemId, NestingLimitPolicy, Order, SharedStore, StoreError,
};
use web_time::Instant;

use crate::event::GridEvent;
use crate::lease::DragLease;
use crate::session::{
    CommitPlan, DragEffect, DragNoopReason, DragSession, DragState, DragTransition, FrameContext,
    OutsideBounds,
};

/// Where a tile released outside the container goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Remove it from the board and hand it to the host in
    /// [`GridEvent::ItemRemoved`].
    Detach,
    /// Move it to the front of another container in the same commit.
    TransferToFront(ContainerId),
}

pub struct GridController {
    container: ContainerId,
    store: Arc<SharedStore>,
    geometry: GridGeometry,
    config: EngineConfig,
    policy: Arc<dyn FolderMergePolicy>,
    bounds: Option<OutsideBounds>,
    exit: ExitPolicy,
    recognizer: HoldRecognizer,
    /// Pointers that went down on a tile and have not resolved yet.
    pressed: BTreeMap<u32, ItemId>,
    lease: Arc<DragLease>,
    session: Option<DragSession>,
    editing: bool,
    transition_counter: u64,
    last_transition: Option<DragTransition>,
}

impl GridController {
    /// Controller over `container` with the default nesting policy, its own
    /// lease, and outside detection disabled.
    #[must_use]
    pub fn new(
        container: ContainerId,
        store: Arc<SharedStore>,
        geometry: GridGeometry,
        config: EngineConfig,
    ) -> Self {
        let policy: Arc<dyn FolderMergePolicy> = Arc::new(NestingLimitPolicy::from_config(&config));
        Self {
            container,
            store,
            geometry,
            recognizer: HoldRecognizer::new(config.hold_config()),
            config,
            policy,
            bounds: None,
            exit: ExitPolicy::Detach,
            pressed: BTreeMap::new(),
            lease: Arc::new(DragLease::new()),
            session: None,
            editing: false,
            transition_counter: 0,
            last_transition: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn FolderMergePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Enable outside detection for a container `container_height` pixels
    /// tall, using the configured margins.
    #[must_use]
    pub fn with_outside_bounds(mut self, container_height: f32) -> Self {
        self.bounds = Some(OutsideBounds::new(
            self.config.outside_top_margin(self.geometry.item_height),
            container_height,
            self.config.outside_bottom_margin_px,
        ));
        self
    }

    #[must_use]
    pub fn with_exit(mut self, exit: ExitPolicy) -> Self {
        self.exit = exit;
        self
    }

    /// Share a drag lease with other controllers of the same container.
    #[must_use]
    pub fn with_lease(mut self, lease: Arc<DragLease>) -> Self {
        self.lease = lease;
        self
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<SharedStore> {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Replace the geometry after a layout pass. A live session keeps the
    /// geometry it started with for its start rect.
    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.geometry = geometry;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn lease(&self) -> &Arc<DragLease> {
        &self.lease
    }

    // ------------------------------------------------------------------
    // Raw pointer input
    // ------------------------------------------------------------------

    /// Feed one pointer sample.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<GridEvent> {
        let mut out = Vec::new();
        if event.phase == PointerPhase::Down {
            // Hit-test what is drawn: mid-drag that is the reflowed order.
            let order = self.display_order();
            let hit = self
                .geometry
                .hit_test(event.position, order.len())
                .and_then(|index| order.get(index));
            match hit {
                Some(item) => {
                    let from = self.drag_state();
                    self.pressed.insert(event.pointer_id, item);
                    let to = if from.is_dragging() { from } else { DragState::Pending };
                    self.record(from, to, DragEffect::Pressed { item });
                }
                None => {
                    if self.session.is_none() {
                        out.extend(self.cancel_editing());
                    }
                    return out;
                }
            }
        }

        let signals = self.recognizer.process(event);
        if signals.is_empty()
            && event.phase == PointerPhase::Move
            && self.recognizer.is_pending(event.pointer_id)
        {
            let state = self.drag_state();
            self.record(
                state,
                state,
                DragEffect::Noop {
                    reason: DragNoopReason::ThresholdNotReached,
                },
            );
        }
        for signal in signals {
            self.handle_signal(signal, &mut out);
        }
        out
    }

    /// Fire long presses whose threshold elapsed by `now`. Call once per frame.
    pub fn tick(&mut self, now: Instant) -> Vec<GridEvent> {
        let mut out = Vec::new();
        for signal in self.recognizer.check_hold(now) {
            self.handle_signal(signal, &mut out);
        }
        out
    }

    fn handle_signal(&mut self, signal: HoldSignal, out: &mut Vec<GridEvent>) {
        match signal {
            HoldSignal::Tap { pointer_id, .. } => {
                let Some(item) = self.pressed.remove(&pointer_id) else {
                    return;
                };
                let to = self.drag_state();
                self.record(DragState::Pending, to, DragEffect::Tapped { item });
                let snapshot = self.store.load();
                if let Some(folder) = snapshot.find(item).filter(|found| found.is_folder()) {
                    tracing::debug!(
                        target: "tilegrid.controller",
                        folder = item.get(),
                        "folder tapped"
                    );
                    out.push(GridEvent::FolderOpened {
                        folder: folder.clone(),
                    });
                }
            }
            HoldSignal::TapAborted { pointer_id } => {
                if let Some(item) = self.pressed.remove(&pointer_id) {
                    let to = self.drag_state();
                    self.record(DragState::Pending, to, DragEffect::HoldAborted { item });
                }
            }
            HoldSignal::HoldStarted {
                pointer_id, origin, ..
            } => {
                if let Some(item) = self.pressed.remove(&pointer_id) {
                    out.extend(self.begin(item, Some(pointer_id), origin));
                }
            }
            HoldSignal::Moved {
                pointer_id,
                position,
            } => match self.session_for_pointer(pointer_id) {
                Some(item) => {
                    self.on_gesture_move(item, position);
                }
                None => {
                    let state = self.drag_state();
                    self.record(
                        state,
                        state,
                        DragEffect::Noop {
                            reason: DragNoopReason::PointerMismatch,
                        },
                    );
                }
            },
            HoldSignal::Released { pointer_id, .. } => {
                self.pressed.remove(&pointer_id);
                if let Some(item) = self.session_for_pointer(pointer_id) {
                    out.extend(self.on_gesture_end(item));
                }
            }
            HoldSignal::Canceled { pointer_id } => {
                self.pressed.remove(&pointer_id);
                if let Some(item) = self.session_for_pointer(pointer_id) {
                    out.extend(self.on_gesture_cancel(item));
                }
            }
        }
    }

    fn session_for_pointer(&self, pointer_id: u32) -> Option<ItemId> {
        self.session
            .as_ref()
            .filter(|session| session.pointer_id() == Some(pointer_id))
            .map(DragSession::dragged)
    }

    // ------------------------------------------------------------------
    // Gesture callbacks
    // ------------------------------------------------------------------

    /// Long press on `id` fired with the pointer at `at` (Pending→Held).
    ///
    /// Ignored while another drag is active in this container.
    pub fn on_gesture_start(&mut self, id: ItemId, at: Point) -> Vec<GridEvent> {
        self.begin(id, None, at)
    }

    fn begin(&mut self, id: ItemId, pointer_id: Option<u32>, at: Point) -> Vec<GridEvent> {
        let from = self.drag_state();
        if let Some(active) = &self.session {
            tracing::debug!(
                target: "tilegrid.controller",
                requested = id.get(),
                active = active.dragged().get(),
                "concurrent drag ignored"
            );
            self.record(
                from,
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::ActiveDragAlreadyInProgress,
                },
            );
            return Vec::new();
        }

        let snapshot = self.store.load();
        let session = snapshot
            .order(self.container)
            .and_then(|order| DragSession::begin(id, pointer_id, at, order, &self.geometry));
        let Some(session) = session else {
            self.record(
                from,
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::UnknownTarget,
                },
            );
            return Vec::new();
        };

        if let Err(holder) = self.lease.try_acquire(id) {
            tracing::debug!(
                target: "tilegrid.controller",
                requested = id.get(),
                holder = holder.get(),
                container = %self.container,
                "drag lease held elsewhere"
            );
            self.record(
                from,
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::ActiveDragAlreadyInProgress,
                },
            );
            return Vec::new();
        }

        let origin_index = session.origin_index();
        self.session = Some(session);
        self.record(
            from,
            DragState::Held,
            DragEffect::Held {
                item: id,
                origin_index,
            },
        );
        tracing::debug!(
            target: "tilegrid.controller",
            item = id.get(),
            container = %self.container,
            origin_index,
            "hold started"
        );

        let mut out = vec![GridEvent::HoldStarted { id }, GridEvent::ScrollLock(true)];
        if !self.editing {
            self.editing = true;
            out.push(GridEvent::EditingChanged(true));
        }
        out
    }

    /// Per-frame update for the held tile with the pointer at `point`.
    ///
    /// Never writes to the store.
    pub fn on_gesture_move(&mut self, id: ItemId, point: Point) -> DragTransition {
        let from = self.drag_state();
        let Some(session) = self.session.as_mut() else {
            return self.record(
                from,
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            );
        };
        if session.dragged() != id {
            return self.record(
                from,
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::TargetMismatch,
                },
            );
        }

        let snapshot = self.store.load();
        let container = self.container;
        let policy = &*self.policy;
        let merge_allowed = |host: ItemId| {
            snapshot
                .merge_decision(container, host, id, policy)
                .is_ok_and(|decision| decision.is_allowed())
        };
        let ctx = FrameContext {
            geometry: &self.geometry,
            tolerance: self.config.hover_edge_tolerance_px,
            bounds: self.bounds,
            merge_allowed: &merge_allowed,
        };
        let (to, effect) = session.update(point, &ctx);
        let rect = session.live_rect();
        tracing::trace!(
            target: "tilegrid.drag",
            item = id.get(),
            x = rect.x,
            y = rect.y,
            state = ?to,
            "drag frame"
        );
        self.record(from, to, effect)
    }

    /// Pointer released: commit the session's single outcome.
    pub fn on_gesture_end(&mut self, id: ItemId) -> Vec<GridEvent> {
        let from = self.drag_state();
        let Some(session) = self.take_session(id, from) else {
            return Vec::new();
        };
        let plan = session.finish();

        let span = tracing::debug_span!(
            target: "tilegrid.controller",
            "drag.commit",
            item = id.get(),
            container = %self.container,
            outcome = tracing::field::Empty,
        );
        let _entered = span.enter();

        let mut out = Vec::new();
        let effect = match self.commit(id, plan, &mut out) {
            Ok(outcome) => {
                span.record("outcome", outcome);
                tracing::debug!(target: "tilegrid.controller", ?plan, outcome, "drag committed");
                DragEffect::Committed { plan }
            }
            Err(error) => {
                span.record("outcome", "failed");
                tracing::warn!(
                    target: "tilegrid.controller",
                    ?plan,
                    %error,
                    "drag commit failed; board unchanged"
                );
                out.push(GridEvent::CommitFailed { id, error });
                DragEffect::CommitFailed { plan }
            }
        };
        self.lease.release(id);
        self.record(from, DragState::Idle, effect);
        out.push(GridEvent::ScrollLock(false));
        out
    }

    /// Host cancelled the gesture: drop the session without committing.
    pub fn on_gesture_cancel(&mut self, id: ItemId) -> Vec<GridEvent> {
        let from = self.drag_state();
        if self.take_session(id, from).is_none() {
            return Vec::new();
        }
        self.lease.release(id);
        self.record(from, DragState::Idle, DragEffect::Canceled { item: id });
        tracing::debug!(target: "tilegrid.controller", item = id.get(), "drag canceled");
        vec![GridEvent::ScrollLock(false)]
    }

    /// Drop every pending press and cancel any live session.
    pub fn force_cancel(&mut self) -> Vec<GridEvent> {
        self.recognizer.reset();
        self.pressed.clear();
        match self.active_drag() {
            Some(id) => self.on_gesture_cancel(id),
            None => Vec::new(),
        }
    }

    fn take_session(&mut self, id: ItemId, from: DragState) -> Option<DragSession> {
        let reason = match &self.session {
            None => DragNoopReason::IdleWithoutActiveDrag,
            Some(session) if session.dragged() != id => DragNoopReason::TargetMismatch,
            Some(_) => return self.session.take(),
        };
        self.record(from, from, DragEffect::Noop { reason });
        None
    }

    fn commit(
        &self,
        id: ItemId,
        plan: CommitPlan,
        out: &mut Vec<GridEvent>,
    ) -> Result<&'static str, StoreError> {
        let container = self.container;
        match plan {
            CommitPlan::Remove => {
                let item = match self.exit {
                    ExitPolicy::Detach => self
                        .store
                        .update(|board| board.delete_item(container, id))?,
                    ExitPolicy::TransferToFront(destination) => self.store.update(|board| {
                        let item = board
                            .container(container)
                            .and_then(|source| source.get(id))
                            .cloned()
                            .ok_or(StoreError::UnknownItem(id))?;
                        board.transfer_to_front(container, id, destination)?;
                        Ok(item)
                    })?,
                };
                out.push(GridEvent::ItemRemoved { container, item });
                Ok("remove")
            }
            CommitPlan::Merge { host } => {
                let policy = &*self.policy;
                self.store
                    .update(|board| board.merge_into_folder(container, host, id, policy))?;
                let snapshot = self.store.load();
                if let Some(target) = snapshot.container(container) {
                    out.push(GridEvent::ItemsChanged {
                        container,
                        items: target.iter_ordered().cloned().collect(),
                    });
                    out.push(GridEvent::OrderChanged {
                        container,
                        order: target.order().clone(),
                    });
                }
                Ok("merge")
            }
            CommitPlan::Reorder { to } => {
                let current = self
                    .store
                    .load()
                    .order(container)
                    .and_then(|order| order.position(id));
                if current == Some(to) {
                    return Ok("unchanged");
                }
                let order = self.store.update(|board| {
                    board.move_within(container, id, to)?;
                    board
                        .order(container)
                        .cloned()
                        .ok_or(StoreError::UnknownContainer(container))
                })?;
                out.push(GridEvent::OrderChanged { container, order });
                Ok("reorder")
            }
        }
    }

    fn record(&mut self, from: DragState, to: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        };
        self.last_transition = Some(transition);
        transition
    }

    // ------------------------------------------------------------------
    // Editing mode
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Leave editing mode.
    pub fn cancel_editing(&mut self) -> Vec<GridEvent> {
        if self.editing {
            self.editing = false;
            vec![GridEvent::EditingChanged(false)]
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // Per-frame queries
    // ------------------------------------------------------------------

    /// Where `id` should be drawn this frame: the live rect for the dragged
    /// tile, its (possibly reflowed) slot for everything else.
    #[must_use]
    pub fn current_position_of(&self, id: ItemId) -> Option<Rect> {
        let index = match &self.session {
            Some(session) if session.dragged() == id => return Some(session.live_rect()),
            Some(session) => session.working_order().position(id)?,
            None => self.store.load().order(self.container)?.position(id)?,
        };
        Some(self.geometry.position_of(index))
    }

    #[must_use]
    pub fn current_hover_target(&self) -> Option<ItemId> {
        self.session.as_ref().and_then(DragSession::hover_target)
    }

    #[must_use]
    pub fn is_outside(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_outside)
    }

    #[must_use]
    pub fn active_drag(&self) -> Option<ItemId> {
        self.session.as_ref().map(DragSession::dragged)
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        match &self.session {
            Some(session) => session.state(),
            None if !self.pressed.is_empty() => DragState::Pending,
            None => DragState::Idle,
        }
    }

    #[must_use]
    pub fn last_transition(&self) -> Option<DragTransition> {
        self.last_transition
    }

    /// Committed order of this container.
    #[must_use]
    pub fn order(&self) -> Order {
        self.store
            .load()
            .order(self.container)
            .cloned()
            .unwrap_or_default()
    }

    /// Order as currently drawn, including live reflow.
    #[must_use]
    pub fn display_order(&self) -> Order {
        match &self.session {
            Some(session) => session.working_order().clone(),
            None => self.order(),
        }
    }

    /// Scrollable height for a viewport of `viewport_height`.
    #[must_use]
    pub fn content_height(&self, viewport_height: f32) -> f32 {
        let len = self
            .store
            .load()
            .order(self.container)
            .map_or(0, Order::len);
        self.geometry.content_height(len, viewport_height)
    }
}

impl Drop for GridController {
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            self.lease.release(session.dragged());
        }
    }
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("container", &self.container)
            .field("geometry", &self.geometry)
            .field("state", &self.drag_state())
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tilegrid_store::{Item, OrderStore};

    use super::*;

    fn geometry() -> GridGeometry {
        GridGeometry::new(100.0, 100.0, 8.0, 2, 0.0, 0.0).expect("valid geometry")
    }

    fn controller(ids: &[u64]) -> GridController {
        let board = OrderStore::from_items(ids.iter().map(|&id| Item::tile(id, "t")).collect())
            .expect("valid board");
        let store = Arc::new(SharedStore::new(board).expect("valid store"));
        GridController::new(ContainerId::Main, store, geometry(), EngineConfig::default())
    }

    fn order_ids(c: &GridController) -> Vec<u64> {
        c.order().iter().map(ItemId::get).collect()
    }

    #[test]
    fn hold_locks_scroll_and_enters_editing() {
        let mut c = controller(&[1, 2, 3, 4]);
        let events = c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        assert_eq!(
            events,
            vec![
                GridEvent::HoldStarted { id: ItemId(1) },
                GridEvent::ScrollLock(true),
                GridEvent::EditingChanged(true),
            ]
        );
        assert_eq!(c.drag_state(), DragState::Held);
        assert_eq!(c.active_drag(), Some(ItemId(1)));
        assert!(c.lease().is_held());
    }

    #[test]
    fn second_hold_is_a_noop() {
        let mut c = controller(&[1, 2, 3, 4]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        let events = c.on_gesture_start(ItemId(2), Point::new(174.0, 58.0));
        assert!(events.is_empty());
        assert_eq!(c.active_drag(), Some(ItemId(1)));
        assert_eq!(
            c.last_transition().map(|t| t.effect),
            Some(DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            })
        );
        let moved = c.on_gesture_move(ItemId(2), Point::new(0.0, 0.0));
        assert_eq!(
            moved.effect,
            DragEffect::Noop {
                reason: DragNoopReason::TargetMismatch
            }
        );
        assert!(c.on_gesture_end(ItemId(2)).is_empty());
        assert_eq!(c.active_drag(), Some(ItemId(1)));
    }

    #[test]
    fn shared_lease_blocks_other_controller() {
        let mut a = controller(&[1, 2]);
        let mut b = GridController::new(
            ContainerId::Main,
            Arc::clone(a.store()),
            geometry(),
            EngineConfig::default(),
        )
        .with_lease(Arc::clone(a.lease()));
        assert!(!a.on_gesture_start(ItemId(1), Point::new(58.0, 58.0)).is_empty());
        assert!(b.on_gesture_start(ItemId(2), Point::new(174.0, 58.0)).is_empty());
        a.on_gesture_end(ItemId(1));
        assert!(!b.on_gesture_start(ItemId(2), Point::new(174.0, 58.0)).is_empty());
    }

    #[test]
    fn shared_lease_refuses_the_same_item_twice() {
        let mut a = controller(&[1, 2]);
        let mut b = GridController::new(
            ContainerId::Main,
            Arc::clone(a.store()),
            geometry(),
            EngineConfig::default(),
        )
        .with_lease(Arc::clone(a.lease()));
        assert!(!a.on_gesture_start(ItemId(1), Point::new(58.0, 58.0)).is_empty());
        assert!(b.on_gesture_start(ItemId(1), Point::new(58.0, 58.0)).is_empty());
        assert_eq!(b.active_drag(), None);
        assert_eq!(
            b.last_transition().map(|t| t.effect),
            Some(DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            })
        );

        // The refused view never owned the lease, so it cannot free it.
        assert!(b.on_gesture_end(ItemId(1)).is_empty());
        assert_eq!(a.lease().holder(), Some(ItemId(1)));

        a.on_gesture_end(ItemId(1));
        assert!(!a.lease().is_held());
        assert!(!b.on_gesture_start(ItemId(1), Point::new(58.0, 58.0)).is_empty());
    }

    #[test]
    fn press_mid_drag_hits_the_reflowed_slot() {
        let mut c = controller(&[1, 2, 3, 4]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        c.on_gesture_move(ItemId(1), Point::new(174.0, 174.0));
        assert_eq!(
            c.display_order().iter().map(ItemId::get).collect::<Vec<_>>(),
            [2, 3, 4, 1]
        );

        // Slot 0 now shows item 2, even though the store still has 1 there.
        c.process(&PointerEvent::down(2, Point::new(58.0, 58.0), Instant::now()));
        assert_eq!(
            c.last_transition().map(|t| t.effect),
            Some(DragEffect::Pressed { item: ItemId(2) })
        );
        assert_eq!(c.active_drag(), Some(ItemId(1)));
        assert_eq!(order_ids(&c), [1, 2, 3, 4]);
    }

    #[test]
    fn unknown_item_does_not_start() {
        let mut c = controller(&[1, 2]);
        assert!(c.on_gesture_start(ItemId(9), Point::new(0.0, 0.0)).is_empty());
        assert_eq!(c.drag_state(), DragState::Idle);
        assert!(!c.lease().is_held());
    }

    #[test]
    fn release_without_movement_commits_nothing() {
        let mut c = controller(&[1, 2, 3]);
        let revision = c.store().revision();
        c.on_gesture_start(ItemId(2), Point::new(174.0, 58.0));
        let events = c.on_gesture_end(ItemId(2));
        assert_eq!(events, vec![GridEvent::ScrollLock(false)]);
        assert_eq!(c.store().revision(), revision);
        assert!(!c.lease().is_held());
    }

    #[test]
    fn live_positions_follow_reflow() {
        let mut c = controller(&[1, 2, 3, 4]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        c.on_gesture_move(ItemId(1), Point::new(174.0, 174.0));
        assert_eq!(
            c.current_position_of(ItemId(1)),
            Some(Rect::new(124.0, 124.0, 100.0, 100.0))
        );
        // Item 2 slid into slot 0 on screen, but the store is untouched.
        assert_eq!(c.current_position_of(ItemId(2)), Some(geometry().position_of(0)));
        assert_eq!(order_ids(&c), [1, 2, 3, 4]);
        assert_eq!(
            c.display_order().iter().map(ItemId::get).collect::<Vec<_>>(),
            [2, 3, 4, 1]
        );
    }

    #[test]
    fn cancel_restores_everything() {
        let mut c = controller(&[1, 2, 3, 4]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        c.on_gesture_move(ItemId(1), Point::new(174.0, 174.0));
        let events = c.on_gesture_cancel(ItemId(1));
        assert_eq!(events, vec![GridEvent::ScrollLock(false)]);
        assert_eq!(order_ids(&c), [1, 2, 3, 4]);
        assert_eq!(c.drag_state(), DragState::Idle);
        assert!(!c.lease().is_held());
    }

    #[test]
    fn cancel_editing_only_reports_once() {
        let mut c = controller(&[1]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        c.on_gesture_end(ItemId(1));
        assert!(c.is_editing());
        assert_eq!(c.cancel_editing(), vec![GridEvent::EditingChanged(false)]);
        assert!(c.cancel_editing().is_empty());
    }

    #[test]
    fn tap_on_folder_opens_it() {
        let board = OrderStore::from_items(vec![
            Item::tile(1, "a"),
            Item::folder(2, "Games", vec![Item::tile(3, "x")]),
        ])
        .expect("valid board");
        let store = Arc::new(SharedStore::new(board).expect("valid store"));
        let mut c = GridController::new(ContainerId::Main, store, geometry(), EngineConfig::default());
        let t0 = Instant::now();
        let at = Point::new(174.0, 58.0);
        assert!(c.process(&PointerEvent::down(1, at, t0)).is_empty());
        assert_eq!(c.drag_state(), DragState::Pending);
        let events = c.process(&PointerEvent::up(1, at, t0 + Duration::from_millis(80)));
        assert!(matches!(
            events.as_slice(),
            [GridEvent::FolderOpened { folder }] if folder.id == ItemId(2)
        ));
        assert_eq!(c.drag_state(), DragState::Idle);
    }

    #[test]
    fn tap_on_empty_space_leaves_editing() {
        let mut c = controller(&[1]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        c.on_gesture_end(ItemId(1));
        let events = c.process(&PointerEvent::down(1, Point::new(300.0, 300.0), Instant::now()));
        assert_eq!(events, vec![GridEvent::EditingChanged(false)]);
    }

    #[test]
    fn dropping_controller_releases_lease() {
        let lease = Arc::new(DragLease::new());
        {
            let mut c = controller(&[1]).with_lease(Arc::clone(&lease));
            c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
            assert!(lease.is_held());
        }
        assert!(!lease.is_held());
    }

    #[test]
    fn transition_ids_are_monotonic() {
        let mut c = controller(&[1, 2]);
        c.on_gesture_start(ItemId(1), Point::new(58.0, 58.0));
        let a = c.on_gesture_move(ItemId(1), Point::new(60.0, 60.0));
        let b = c.on_gesture_move(ItemId(1), Point::new(62.0, 60.0));
        assert!(b.transition_id > a.transition_id);
        assert_eq!(a.from, DragState::Held);
        assert_eq!(a.to, DragState::Reordering);
    }
}
