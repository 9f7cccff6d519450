#![forbid(unsafe_code)]

//! Normalized pointer events fed to the engine by a host.
//!
//! A host translates whatever its platform delivers (touch, mouse, pen) into
//! a stream of [`PointerEvent`]s. Each physical contact carries a stable
//! `pointer_id` from `Down` until `Up` or `Cancel`.

use web_time::Instant;

use crate::geometry::Point;

/// Lifecycle phase of one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The host interrupted the gesture (system alert, focus loss, ...).
    Cancel,
}

/// One pointer sample in container-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub phase: PointerPhase,
    pub position: Point,
    pub timestamp: Instant,
}

impl PointerEvent {
    #[must_use]
    pub fn new(pointer_id: u32, phase: PointerPhase, position: Point, timestamp: Instant) -> Self {
        Self {
            pointer_id,
            phase,
            position,
            timestamp,
        }
    }

    #[must_use]
    pub fn down(pointer_id: u32, position: Point, timestamp: Instant) -> Self {
        Self::new(pointer_id, PointerPhase::Down, position, timestamp)
    }

    #[must_use]
    pub fn moved(pointer_id: u32, position: Point, timestamp: Instant) -> Self {
        Self::new(pointer_id, PointerPhase::Move, position, timestamp)
    }

    #[must_use]
    pub fn up(pointer_id: u32, position: Point, timestamp: Instant) -> Self {
        Self::new(pointer_id, PointerPhase::Up, position, timestamp)
    }

    #[must_use]
    pub fn cancel(pointer_id: u32, position: Point, timestamp: Instant) -> Self {
        Self::new(pointer_id, PointerPhase::Cancel, position, timestamp)
    }
}
