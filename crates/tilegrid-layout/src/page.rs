#![forbid(unsafe_code)]

//! Read-only page windows over an order.
//!
//! Pages are numbered from 1. Slicing never copies or reorders the
//! underlying sequence; an out-of-range page is simply empty.

use serde::{Deserialize, Serialize};

/// Fixed-size pagination over any slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    page_size: usize,
}

impl PageView {
    /// A view with `page_size` entries per page. Zero is treated as one.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`.
    #[inline]
    #[must_use]
    pub const fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Entries shown on 1-based `page`.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let Some(range) = self.range(items.len(), page) else {
            return &[];
        };
        &items[range]
    }

    /// Index range of 1-based `page` within a sequence of `len`.
    #[must_use]
    pub fn range(&self, len: usize, page: usize) -> Option<std::ops::Range<usize>> {
        if page == 0 {
            return None;
        }
        let start = (page - 1).checked_mul(self.page_size)?;
        if start >= len {
            return None;
        }
        Some(start..(start + self.page_size).min(len))
    }

    /// 1-based page holding order position `index`.
    #[inline]
    #[must_use]
    pub const fn page_of(&self, index: usize) -> usize {
        index / self.page_size + 1
    }
}

impl Default for PageView {
    fn default() -> Self {
        Self::new(9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let view = PageView::new(9);
        assert_eq!(view.page_count(0), 0);
        assert_eq!(view.page_count(9), 1);
        assert_eq!(view.page_count(10), 2);
    }

    #[test]
    fn pages_are_one_based() {
        let view = PageView::new(3);
        let order: Vec<u64> = (1..=7).collect();
        assert!(view.page(&order, 0).is_empty());
        assert_eq!(view.page(&order, 1), &[1, 2, 3]);
        assert_eq!(view.page(&order, 3), &[7]);
        assert!(view.page(&order, 4).is_empty());
    }

    #[test]
    fn page_of_matches_slicing() {
        let view = PageView::new(4);
        let order: Vec<usize> = (0..10).collect();
        for index in 0..order.len() {
            assert!(view.page(&order, view.page_of(index)).contains(&index));
        }
    }

    #[test]
    fn zero_page_size_is_one() {
        let view = PageView::new(0);
        assert_eq!(view.page_size(), 1);
        assert_eq!(view.page_count(3), 3);
    }

    #[test]
    fn huge_page_number_is_empty() {
        let view = PageView::new(9);
        assert_eq!(view.range(10, usize::MAX), None);
    }
}
