#![forbid(unsafe_code)]

//! Layout primitives: the grid geometry mapper and page slicing.
//!
//! Everything in this crate is a pure function of its inputs. The mapper
//! converts between order positions, `(row, col)` cells, and pixel rects for
//! one container; pages are read-only windows over an order.

pub mod grid;
pub mod page;

pub use grid::{Cell, CellCandidates, GridGeometry};
pub use page::PageView;
pub use tilegrid_core::geometry::{Point, Rect};

/// Errors while deriving grid geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid {field} value {value} (must be finite and > 0)")]
    InvalidItemSize { field: &'static str, value: f32 },

    #[error("invalid {field} value {value}")]
    InvalidSpacing { field: &'static str, value: f32 },

    #[error("columns_per_row must be >= 1")]
    ZeroColumns,
}
