#![forbid(unsafe_code)]

//! A grid's item set plus its visual order.
//!
//! # Invariants
//!
//! 1. `order` is a permutation of the keys of `items`.
//! 2. Every folder item's nested container satisfies (1) recursively.
//!
//! Mutators in this module keep both sides in lockstep; deserialized or
//! hand-built containers are checked with [`Container::validate`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::OrderViolation;
use crate::item::{ContainerId, Item, ItemId};
use crate::order::Order;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Container {
    #[serde(with = "items_as_seq")]
    items: BTreeMap<ItemId, Item>,
    order: Order,
}

/// Items serialize as a list so every id lives in exactly one place.
mod items_as_seq {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::item::{Item, ItemId};

    pub(super) fn serialize<S: Serializer>(
        items: &BTreeMap<ItemId, Item>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.values())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ItemId, Item>, D::Error> {
        let list = Vec::<Item>::deserialize(deserializer)?;
        let mut items = BTreeMap::new();
        for item in list {
            let id = item.id;
            if items.insert(id, item).is_some() {
                return Err(D::Error::custom(format_args!("duplicate item id {id}")));
            }
        }
        Ok(items)
    }
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container whose order follows `items` as given.
    ///
    /// Nothing is repaired: a repeated id keeps its first item but appears in
    /// the order once per occurrence, so [`Container::validate`] reports it as
    /// [`OrderViolation::DuplicateId`].
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut container = Self::new();
        for item in items {
            container.order.push(item.id);
            container.items.entry(item.id).or_insert(item);
        }
        container
    }

    /// Build from raw parts without repairing the order. Check with
    /// [`Container::validate`] before use.
    ///
    /// Fails on the first id that `items` holds twice.
    pub fn from_parts(items: Vec<Item>, order: Order) -> Result<Self, OrderViolation> {
        let mut map = BTreeMap::new();
        for item in items {
            let id = item.id;
            if map.insert(id, item).is_some() {
                return Err(OrderViolation::DuplicateId(id));
            }
        }
        Ok(Self { items: map, order })
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &BTreeMap<ItemId, Item> {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> &Order {
        &self.order
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Items in visual order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().filter_map(|id| self.items.get(&id))
    }

    /// Item at visual position `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Item> {
        self.order.get(index).and_then(|id| self.items.get(&id))
    }

    /// Check the permutation invariant here and in every nested folder.
    pub fn validate(&self, id: ContainerId) -> Result<(), (ContainerId, OrderViolation)> {
        let ids: BTreeSet<ItemId> = self.items.keys().copied().collect();
        self.order.validate_against(&ids).map_err(|v| (id, v))?;
        for item in self.items.values() {
            if let Some(nested) = &item.folder {
                nested.validate(ContainerId::Folder(item.id))?;
            }
        }
        Ok(())
    }

    pub(crate) fn insert_at(&mut self, index: usize, item: Item) -> usize {
        let id = item.id;
        self.items.insert(id, item);
        self.order.insert_at(index, id)
    }

    pub(crate) fn push(&mut self, item: Item) {
        let id = item.id;
        self.items.insert(id, item);
        self.order.push(id);
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> Option<(usize, Item)> {
        let item = self.items.remove(&id)?;
        let at = self.order.remove(id).unwrap_or(self.order.len());
        Some((at, item))
    }

    pub(crate) fn move_within(&mut self, id: ItemId, index: usize) -> Option<usize> {
        self.order.move_within(id, index)
    }

    pub(crate) fn set_order(&mut self, order: Order) {
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_items_keeps_given_order() {
        let c = Container::from_items(vec![Item::tile(3, "c"), Item::tile(1, "a")]);
        assert_eq!(*c.order(), [3, 1]);
        let names: Vec<&str> = c.iter_ordered().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["c", "a"]);
    }

    #[test]
    fn from_items_reports_repeated_ids() {
        let c = Container::from_items(vec![
            Item::tile(1, "a"),
            Item::tile(2, "b"),
            Item::tile(1, "a2"),
        ]);
        assert_eq!(*c.order(), [1, 2, 1]);
        assert_eq!(c.get(ItemId(1)).map(|i| i.name.as_str()), Some("a"));
        assert_eq!(
            c.validate(ContainerId::Main),
            Err((ContainerId::Main, OrderViolation::DuplicateId(ItemId(1))))
        );
    }

    #[test]
    fn repeated_child_ids_fail_the_folder() {
        let c = Container::from_items(vec![Item::folder(
            5,
            "f",
            vec![Item::tile(6, "x"), Item::tile(6, "y")],
        )]);
        assert_eq!(
            c.validate(ContainerId::Main),
            Err((
                ContainerId::Folder(ItemId(5)),
                OrderViolation::DuplicateId(ItemId(6))
            ))
        );
    }

    #[test]
    fn validate_reports_nested_container() {
        let mut folder = Item::folder(10, "f", vec![Item::tile(11, "x")]);
        if let Some(nested) = folder.folder.as_mut() {
            nested.set_order(Order::from(vec![ItemId(11), ItemId(12)]));
        }
        let c = Container::from_items(vec![folder]);
        assert_eq!(
            c.validate(ContainerId::Main),
            Err((
                ContainerId::Folder(ItemId(10)),
                OrderViolation::DanglingId(ItemId(12))
            ))
        );
    }

    #[test]
    fn remove_keeps_sides_in_lockstep() {
        let mut c = Container::from_items(vec![Item::tile(1, "a"), Item::tile(2, "b")]);
        let (at, item) = c.remove(ItemId(1)).expect("present");
        assert_eq!(at, 0);
        assert_eq!(item.name, "a");
        assert_eq!(*c.order(), [2]);
        assert!(!c.contains(ItemId(1)));
        assert_eq!(c.validate(ContainerId::Main), Ok(()));
    }

    #[test]
    fn json_rejects_duplicate_items() {
        let json = r#"{"items":[{"id":1,"name":"a"},{"id":1,"name":"b"}],"order":[1]}"#;
        assert!(serde_json::from_str::<Container>(json).is_err());
    }

    #[test]
    fn from_parts_does_not_repair() {
        let c = Container::from_parts(vec![Item::tile(1, "a")], Order::new()).expect("distinct");
        assert_eq!(
            c.validate(ContainerId::Main),
            Err((ContainerId::Main, OrderViolation::MissingId(ItemId(1))))
        );
    }

    #[test]
    fn from_parts_rejects_repeated_items() {
        let parts = Container::from_parts(
            vec![Item::tile(1, "a"), Item::tile(1, "b")],
            Order::from(vec![ItemId(1)]),
        );
        assert_eq!(parts, Err(OrderViolation::DuplicateId(ItemId(1))));
    }
}
