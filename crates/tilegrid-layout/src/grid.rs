#![forbid(unsafe_code)]

//! Grid geometry mapper.
//!
//! Converts between an order position, a `(row, col)` cell, and the pixel
//! rect of that slot. Slots are `item + 2*margin` apart on both axes and the
//! tile sits `margin` inside its slot:
//!
//! ```text
//! x = offset_x + (item_width  + 2*margin) * col + margin
//! y = offset_y + (item_height + 2*margin) * row + margin
//! ```
//!
//! # Drag-time cell policies
//!
//! While a tile is dragged two candidate cells are derived from its live rect:
//!
//! - **Edge-biased** (insertion slot): per axis, a negative drag probes the
//!   rect's far edge plus `tolerance`, a positive (or zero) drag probes the
//!   near edge minus `tolerance`. Tiles slide past each other instead of
//!   flickering when two slots are nearly adjacent.
//! - **Center** (hover target): the cell containing the rect's center.
//!
//! Both are clamped to `col ∈ [0, columns_per_row]` and
//! `row ∈ [0, (len-1) / columns_per_row]`, so a drag far outside the grid
//! never extrapolates more than one column past the populated area.

use serde::{Deserialize, Serialize};
use tilegrid_core::geometry::{Point, Rect};

use crate::LayoutError;

/// A `(row, col)` grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Both drag-time cell candidates for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCandidates {
    /// Direction-biased cell used for the insertion slot.
    pub edge: Cell,
    /// Cell under the dragged rect's center, used for hover.
    pub center: Cell,
}

impl CellCandidates {
    /// Whether the dragged rect sits squarely in one slot (reorder, not hover).
    #[inline]
    #[must_use]
    pub fn agree(&self) -> bool {
        self.edge == self.center
    }
}

/// Pixel parameters of one container's grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub item_width: f32,
    pub item_height: f32,
    pub margin: f32,
    pub columns_per_row: usize,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl GridGeometry {
    /// Build geometry from explicit parameters.
    pub fn new(
        item_width: f32,
        item_height: f32,
        margin: f32,
        columns_per_row: usize,
        offset_x: f32,
        offset_y: f32,
    ) -> Result<Self, LayoutError> {
        check_item_size("item_width", item_width)?;
        check_item_size("item_height", item_height)?;
        if !margin.is_finite() || margin < 0.0 {
            return Err(LayoutError::InvalidSpacing {
                field: "margin",
                value: margin,
            });
        }
        if !offset_x.is_finite() {
            return Err(LayoutError::InvalidSpacing {
                field: "offset_x",
                value: offset_x,
            });
        }
        if !offset_y.is_finite() {
            return Err(LayoutError::InvalidSpacing {
                field: "offset_y",
                value: offset_y,
            });
        }
        if columns_per_row == 0 {
            return Err(LayoutError::ZeroColumns);
        }
        Ok(Self {
            item_width,
            item_height,
            margin,
            columns_per_row,
            offset_x,
            offset_y,
        })
    }

    /// Fit as many columns as `container_width` allows and center them.
    ///
    /// `columns_per_row = floor(container_width / (item_width + 2*margin))`,
    /// never less than one.
    pub fn fit(
        container_width: f32,
        item_width: f32,
        item_height: f32,
        margin: f32,
        offset_y: f32,
    ) -> Result<Self, LayoutError> {
        check_item_size("item_width", item_width)?;
        if !container_width.is_finite() {
            return Err(LayoutError::InvalidSpacing {
                field: "container_width",
                value: container_width,
            });
        }
        let stride = item_width + 2.0 * margin;
        let fitted = (container_width / stride).floor();
        let columns = if fitted >= 1.0 { fitted as usize } else { 1 };
        let usable = columns as f32 * stride;
        let offset_x = (container_width - usable) / 2.0;
        Self::new(item_width, item_height, margin, columns, offset_x, offset_y)
    }

    /// Horizontal distance between slot origins.
    #[inline]
    #[must_use]
    pub fn stride_x(&self) -> f32 {
        self.item_width + 2.0 * self.margin
    }

    /// Vertical distance between slot origins.
    #[inline]
    #[must_use]
    pub fn stride_y(&self) -> f32 {
        self.item_height + 2.0 * self.margin
    }

    /// Cell holding order position `index`.
    #[inline]
    #[must_use]
    pub fn cell_of_index(&self, index: usize) -> Cell {
        Cell::new(index / self.columns_per_row, index % self.columns_per_row)
    }

    /// Pixel rect of the tile at order position `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Rect {
        let cell = self.cell_of_index(index);
        Rect::new(
            self.offset_x + self.stride_x() * cell.col as f32 + self.margin,
            self.offset_y + self.stride_y() * cell.row as f32 + self.margin,
            self.item_width,
            self.item_height,
        )
    }

    /// Highest row index a drag may resolve to for an order of `order_len`.
    #[inline]
    #[must_use]
    pub fn max_row(&self, order_len: usize) -> usize {
        order_len.saturating_sub(1) / self.columns_per_row
    }

    /// Insertion cell for a tile whose top-left is `origin`, dragged by
    /// `translation` since the hold began.
    #[must_use]
    pub fn edge_biased_cell(
        &self,
        origin: Point,
        translation: (f32, f32),
        order_len: usize,
        tolerance: f32,
    ) -> Cell {
        let (dx, dy) = translation;
        let probe_x = if dx < 0.0 {
            origin.x + self.item_width + tolerance
        } else {
            origin.x - tolerance
        };
        let probe_y = if dy < 0.0 {
            origin.y + self.item_height + tolerance
        } else {
            origin.y - tolerance
        };
        Cell::new(
            clamp_axis(probe_y - self.offset_y, self.stride_y(), self.max_row(order_len)),
            clamp_axis(probe_x - self.offset_x, self.stride_x(), self.columns_per_row),
        )
    }

    /// Cell under the center of a tile whose top-left is `origin`.
    #[must_use]
    pub fn center_cell(&self, origin: Point, order_len: usize) -> Cell {
        let cx = origin.x + self.item_width / 2.0;
        let cy = origin.y + self.item_height / 2.0;
        Cell::new(
            clamp_axis(cy - self.offset_y, self.stride_y(), self.max_row(order_len)),
            clamp_axis(cx - self.offset_x, self.stride_x(), self.columns_per_row),
        )
    }

    /// Both drag-time candidates for one frame.
    #[must_use]
    pub fn cell_candidates(
        &self,
        origin: Point,
        translation: (f32, f32),
        order_len: usize,
        tolerance: f32,
    ) -> CellCandidates {
        CellCandidates {
            edge: self.edge_biased_cell(origin, translation, order_len, tolerance),
            center: self.center_cell(origin, order_len),
        }
    }

    /// Order position for `cell`, clamped to `[0, order_len]`.
    #[inline]
    #[must_use]
    pub fn order_position_from_cell(&self, cell: Cell, order_len: usize) -> usize {
        (cell.row * self.columns_per_row + cell.col).min(order_len)
    }

    /// Order position of a cell that lies inside the grid's columns.
    ///
    /// The clamped "one past the last column" cell maps to `None` rather than
    /// wrapping onto the next row.
    #[inline]
    #[must_use]
    pub fn index_of_cell(&self, cell: Cell) -> Option<usize> {
        (cell.col < self.columns_per_row).then(|| cell.row * self.columns_per_row + cell.col)
    }

    /// Number of populated rows for an order of `order_len`.
    #[inline]
    #[must_use]
    pub fn rows(&self, order_len: usize) -> usize {
        if order_len == 0 {
            0
        } else {
            (order_len - 1) / self.columns_per_row + 1
        }
    }

    /// Scrollable content height: the populated rows plus a trailing margin,
    /// never less than the viewport.
    #[must_use]
    pub fn content_height(&self, order_len: usize, viewport_height: f32) -> f32 {
        let rows = self.rows(order_len) as f32;
        let content = self.offset_y + self.stride_y() * rows + self.margin;
        content.max(viewport_height)
    }

    /// Order position whose tile contains `point`, if any.
    ///
    /// Margins between tiles are not part of any tile.
    #[must_use]
    pub fn hit_test(&self, point: Point, order_len: usize) -> Option<usize> {
        if !point.is_finite() {
            return None;
        }
        let col = ((point.x - self.offset_x) / self.stride_x()).floor();
        let row = ((point.y - self.offset_y) / self.stride_y()).floor();
        if col < 0.0 || row < 0.0 || col >= self.columns_per_row as f32 {
            return None;
        }
        let index = row as usize * self.columns_per_row + col as usize;
        (index < order_len && self.position_of(index).contains(point)).then_some(index)
    }
}

fn check_item_size(field: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidItemSize { field, value })
    }
}

/// `floor(value / stride)` clamped to `[0, max]`.
fn clamp_axis(value: f32, stride: f32, max: usize) -> usize {
    let raw = (value / stride).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= max as f32 {
        max
    } else {
        raw as usize
    }
}
