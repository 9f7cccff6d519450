#![forbid(unsafe_code)]

//! Ordered id sequences.
//!
//! An [`Order`] is the visual sequence of one container. Operations here are
//! pure sequence edits; the permutation invariant against a container's items
//! is checked by [`Order::validate_against`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::OrderViolation;
use crate::item::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(Vec<ItemId>);

impl Order {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ItemId> {
        self.0.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.0.iter().position(|&entry| entry == id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.0.iter().copied()
    }

    /// Remove `id` and splice it back in at `index`, where `index` counts
    /// positions with `id` excluded. Returns the final position,
    /// `min(index, len - 1)`, or `None` if `id` is absent.
    pub fn move_within(&mut self, id: ItemId, index: usize) -> Option<usize> {
        let from = self.position(id)?;
        self.0.remove(from);
        let to = index.min(self.0.len());
        self.0.insert(to, id);
        Some(to)
    }

    /// Remove `id`, returning the position it occupied.
    pub fn remove(&mut self, id: ItemId) -> Option<usize> {
        let at = self.position(id)?;
        self.0.remove(at);
        Some(at)
    }

    /// Insert `id` at `index` (clamped to the end). Returns the final position.
    pub fn insert_at(&mut self, index: usize, id: ItemId) -> usize {
        let at = index.min(self.0.len());
        self.0.insert(at, id);
        at
    }

    pub fn push(&mut self, id: ItemId) {
        self.0.push(id);
    }

    /// Check that this order is a permutation of `ids`.
    pub fn validate_against(&self, ids: &BTreeSet<ItemId>) -> Result<(), OrderViolation> {
        let mut seen = BTreeSet::new();
        for &id in &self.0 {
            if !seen.insert(id) {
                return Err(OrderViolation::DuplicateId(id));
            }
            if !ids.contains(&id) {
                return Err(OrderViolation::DanglingId(id));
            }
        }
        match ids.difference(&seen).next() {
            Some(&missing) => Err(OrderViolation::MissingId(missing)),
            None => Ok(()),
        }
    }

    /// Whether `other` holds exactly the same ids (in any order).
    #[must_use]
    pub fn is_permutation_of(&self, other: &Order) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut counts: BTreeMap<ItemId, isize> = BTreeMap::new();
        for id in self.iter() {
            *counts.entry(id).or_default() += 1;
        }
        for id in other.iter() {
            *counts.entry(id).or_default() -= 1;
        }
        counts.values().all(|&count| count == 0)
    }
}

impl From<Vec<ItemId>> for Order {
    fn from(ids: Vec<ItemId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<ItemId> for Order {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = ItemId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ItemId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl PartialEq<[u64]> for Order {
    fn eq(&self, other: &[u64]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a.0 == *b)
    }
}

impl<const N: usize> PartialEq<[u64; N]> for Order {
    fn eq(&self, other: &[u64; N]) -> bool {
        *self == other[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[u64]) -> Order {
        ids.iter().copied().map(ItemId).collect()
    }

    #[test]
    fn move_forward_uses_splice_semantics() {
        let mut o = order(&[1, 2, 3, 4]);
        assert_eq!(o.move_within(ItemId(1), 3), Some(3));
        assert_eq!(o, [2, 3, 4, 1]);
    }

    #[test]
    fn move_backward() {
        let mut o = order(&[1, 2, 3, 4]);
        assert_eq!(o.move_within(ItemId(4), 1), Some(1));
        assert_eq!(o, [1, 4, 2, 3]);
    }

    #[test]
    fn move_past_end_clamps() {
        let mut o = order(&[1, 2, 3]);
        assert_eq!(o.move_within(ItemId(1), 99), Some(2));
        assert_eq!(o, [2, 3, 1]);
    }

    #[test]
    fn move_to_current_index_is_idempotent() {
        let mut o = order(&[1, 2, 3]);
        assert_eq!(o.move_within(ItemId(2), 1), Some(1));
        assert_eq!(o, [1, 2, 3]);
    }

    #[test]
    fn move_missing_id_is_none() {
        let mut o = order(&[1, 2]);
        assert_eq!(o.move_within(ItemId(9), 0), None);
        assert_eq!(o, [1, 2]);
    }

    #[test]
    fn remove_then_reinsert_round_trips() {
        let original = order(&[5, 6, 7, 8]);
        let mut o = original.clone();
        let at = o.remove(ItemId(7)).expect("present");
        o.insert_at(at, ItemId(7));
        assert_eq!(o, original);
    }

    #[test]
    fn validate_detects_each_violation() {
        let ids: BTreeSet<ItemId> = [1, 2, 3].into_iter().map(ItemId).collect();
        assert_eq!(order(&[3, 1, 2]).validate_against(&ids), Ok(()));
        assert_eq!(
            order(&[1, 1, 2]).validate_against(&ids),
            Err(OrderViolation::DuplicateId(ItemId(1)))
        );
        assert_eq!(
            order(&[1, 2, 9]).validate_against(&ids),
            Err(OrderViolation::DanglingId(ItemId(9)))
        );
        assert_eq!(
            order(&[1, 2]).validate_against(&ids),
            Err(OrderViolation::MissingId(ItemId(3)))
        );
    }

    #[test]
    fn permutation_check() {
        assert!(order(&[1, 2, 3]).is_permutation_of(&order(&[3, 1, 2])));
        assert!(!order(&[1, 2, 3]).is_permutation_of(&order(&[1, 2, 2])));
        assert!(!order(&[1, 2]).is_permutation_of(&order(&[1, 2, 3])));
    }
}
