#![forbid(unsafe_code)]

//! Hold recognition: transforms raw pointer events into tap/hold signals.
//!
//! [`HoldRecognizer`] tracks every pointer that is currently down and decides,
//! per pointer, whether the contact is a tap or a long-press hold.
//!
//! # State Machine
//!
//! ```text
//! Down -> Pending --(threshold elapsed, within tolerance)--> Held --> Released | Canceled
//!            \--(up before threshold)--> Tap
//!            \--(moved beyond tolerance / cancel)--> TapAborted
//! ```
//!
//! # Invariants
//!
//! 1. A pointer produces at most one of `Tap` or `HoldStarted`.
//! 2. `Moved`, `Released`, and `Canceled` are only emitted after `HoldStarted`
//!    for the same pointer.
//! 3. A hold never fires twice for one contact.
//! 4. After [`reset`](HoldRecognizer::reset) no pointer is tracked.
//!
//! # Failure Modes
//!
//! - Events for a pointer that was never seen going down are ignored.
//! - If the host never calls [`check_hold`](HoldRecognizer::check_hold), a hold
//!   still fires lazily on the next move or up sample that arrives after the
//!   threshold.

use std::collections::BTreeMap;
use std::time::Duration;

use web_time::Instant;

use crate::event::{PointerEvent, PointerPhase};
use crate::geometry::Point;

/// Thresholds for hold recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldConfig {
    /// Duration before a stationary contact becomes a hold (default: 300ms).
    pub long_press_threshold: Duration,
    /// Maximum euclidean travel (pixels) allowed while pending (default: 20).
    pub move_tolerance: f32,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(300),
            move_tolerance: 20.0,
        }
    }
}

/// Signal emitted for one tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldSignal {
    /// Contact released before the threshold without leaving the tolerance.
    Tap { pointer_id: u32, position: Point },
    /// Contact was abandoned while pending (moved too far or cancelled).
    TapAborted { pointer_id: u32 },
    /// Long-press threshold elapsed; `origin` is the pointer-down position.
    HoldStarted {
        pointer_id: u32,
        origin: Point,
        duration: Duration,
    },
    /// Movement while held.
    Moved { pointer_id: u32, position: Point },
    /// Pointer lifted while held.
    Released { pointer_id: u32, position: Point },
    /// Host cancelled a held gesture.
    Canceled { pointer_id: u32 },
}

#[derive(Debug, Clone, Copy)]
struct PointerTrack {
    origin: Point,
    down_at: Instant,
    held: bool,
}

/// Stateful per-pointer hold recognizer.
///
/// Call [`process`](HoldRecognizer::process) for each incoming
/// [`PointerEvent`] and [`check_hold`](HoldRecognizer::check_hold) once per
/// frame so stationary holds fire on time.
#[derive(Debug, Clone, Default)]
pub struct HoldRecognizer {
    config: HoldConfig,
    pointers: BTreeMap<u32, PointerTrack>,
}

impl HoldRecognizer {
    #[must_use]
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            pointers: BTreeMap::new(),
        }
    }

    /// Process a raw pointer event, returning any signals produced.
    pub fn process(&mut self, event: &PointerEvent) -> Vec<HoldSignal> {
        let mut out = Vec::with_capacity(2);
        let id = event.pointer_id;
        let pos = event.position;

        match event.phase {
            PointerPhase::Down => {
                // A repeated down for a live pointer restarts it.
                self.pointers.insert(
                    id,
                    PointerTrack {
                        origin: pos,
                        down_at: event.timestamp,
                        held: false,
                    },
                );
            }
            PointerPhase::Move => {
                let Some(track) = self.pointers.get_mut(&id) else {
                    return out;
                };
                if track.held {
                    out.push(HoldSignal::Moved {
                        pointer_id: id,
                        position: pos,
                    });
                    return out;
                }
                let elapsed = event.timestamp.saturating_duration_since(track.down_at);
                if elapsed >= self.config.long_press_threshold
                    && track.origin.distance(pos) <= self.config.move_tolerance
                {
                    // Threshold passed while the host was not ticking.
                    track.held = true;
                    out.push(HoldSignal::HoldStarted {
                        pointer_id: id,
                        origin: track.origin,
                        duration: elapsed,
                    });
                    out.push(HoldSignal::Moved {
                        pointer_id: id,
                        position: pos,
                    });
                } else if track.origin.distance(pos) > self.config.move_tolerance {
                    self.pointers.remove(&id);
                    out.push(HoldSignal::TapAborted { pointer_id: id });
                }
            }
            PointerPhase::Up => {
                let Some(track) = self.pointers.remove(&id) else {
                    return out;
                };
                if track.held {
                    out.push(HoldSignal::Released {
                        pointer_id: id,
                        position: pos,
                    });
                    return out;
                }
                let elapsed = event.timestamp.saturating_duration_since(track.down_at);
                if elapsed >= self.config.long_press_threshold {
                    out.push(HoldSignal::HoldStarted {
                        pointer_id: id,
                        origin: track.origin,
                        duration: elapsed,
                    });
                    out.push(HoldSignal::Released {
                        pointer_id: id,
                        position: pos,
                    });
                } else {
                    out.push(HoldSignal::Tap {
                        pointer_id: id,
                        position: pos,
                    });
                }
            }
            PointerPhase::Cancel => {
                let Some(track) = self.pointers.remove(&id) else {
                    return out;
                };
                if track.held {
                    out.push(HoldSignal::Canceled { pointer_id: id });
                } else {
                    out.push(HoldSignal::TapAborted { pointer_id: id });
                }
            }
        }

        out
    }

    /// Fire holds for every pending pointer whose threshold has elapsed.
    ///
    /// Signals are ordered by pointer id.
    pub fn check_hold(&mut self, now: Instant) -> Vec<HoldSignal> {
        let threshold = self.config.long_press_threshold;
        self.pointers
            .iter_mut()
            .filter(|(_, track)| !track.held)
            .filter_map(|(&pointer_id, track)| {
                let elapsed = now.saturating_duration_since(track.down_at);
                (elapsed >= threshold).then(|| {
                    track.held = true;
                    HoldSignal::HoldStarted {
                        pointer_id,
                        origin: track.origin,
                        duration: elapsed,
                    }
                })
            })
            .collect()
    }

    /// Whether `pointer_id` is down but not yet held.
    #[must_use]
    pub fn is_pending(&self, pointer_id: u32) -> bool {
        self.pointers.get(&pointer_id).is_some_and(|t| !t.held)
    }

    /// Whether `pointer_id` has become a hold.
    #[must_use]
    pub fn is_held(&self, pointer_id: u32) -> bool {
        self.pointers.get(&pointer_id).is_some_and(|t| t.held)
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.pointers.len()
    }

    /// Forget one pointer without emitting anything.
    pub fn forget(&mut self, pointer_id: u32) {
        self.pointers.remove(&pointer_id);
    }

    /// Reset all recognition state.
    pub fn reset(&mut self) {
        self.pointers.clear();
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &HoldConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: HoldConfig) {
        self.config = config;
    }
}
