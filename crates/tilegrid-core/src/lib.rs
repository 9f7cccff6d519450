#![forbid(unsafe_code)]

//! Core: pixel geometry, pointer events, hold recognition, and configuration.
//!
//! # Role in tilegrid
//! `tilegrid-core` is the input layer. It owns the pixel-space primitives the
//! grid mapper works in, the normalized pointer event stream a host feeds the
//! engine, and the long-press recognizer that turns that stream into
//! tap/hold/release signals.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Point`] and [`geometry::Rect`] in container-local pixels.
//! - **Events**: [`event::PointerEvent`] with down/move/up/cancel phases.
//! - **Hold recognition**: [`gesture::HoldRecognizer`] (Pending → Held or tap).
//! - **Configuration**: [`config::EngineConfig`] with the product defaults.
//!
//! # How it fits in the system
//! `tilegrid-layout` maps pixels onto grid cells, `tilegrid-store` owns the
//! item collection, and `tilegrid-runtime` drives drag sessions from the
//! signals this crate produces.

pub mod config;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;

pub use config::{ConfigError, EngineConfig};
pub use event::{PointerEvent, PointerPhase};
pub use geometry::{Point, Rect};
pub use gesture::{HoldConfig, HoldRecognizer, HoldSignal};
