#![forbid(unsafe_code)]

//! The Order Store: the whole board as one tree of containers.
//!
//! # Invariants
//!
//! 1. Every container's order is a permutation of its items.
//! 2. Item ids are unique across the entire board, nested folders included.
//! 3. An item lives in exactly one container.
//!
//! # Failure Modes
//!
//! Every mutator checks its preconditions before touching anything, so an
//! `Err` always leaves the store as it was. [`SharedStore`](crate::SharedStore)
//! additionally re-validates the edited copy before publishing it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::{OrderViolation, StoreError};
use crate::item::{ContainerId, Item, ItemId};
use crate::merge::{FolderMergePolicy, MergeDecision, MergeRequest};
use crate::order::Order;

/// Result of a successful merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// The host was a plain tile and is now a folder.
    Promoted,
    /// The guest joined an existing folder.
    Appended,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderStore {
    main: Container,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Board whose main grid holds `items` in the given order.
    pub fn from_items(items: Vec<Item>) -> Result<Self, StoreError> {
        let store = Self {
            main: Container::from_items(items),
        };
        store.validate()?;
        Ok(store)
    }

    /// Board from an already assembled main container.
    pub fn from_container(main: Container) -> Result<Self, StoreError> {
        let store = Self { main };
        store.validate()?;
        Ok(store)
    }

    #[inline]
    #[must_use]
    pub fn main(&self) -> &Container {
        &self.main
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        match id {
            ContainerId::Main => Some(&self.main),
            ContainerId::Folder(folder) => self.find(folder)?.children(),
        }
    }

    fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        match id {
            ContainerId::Main => Some(&mut self.main),
            ContainerId::Folder(folder) => {
                let parent = self.locate(folder)?;
                self.container_mut(parent)?.get_mut(folder)?.folder.as_mut()
            }
        }
    }

    /// Order of a container.
    #[must_use]
    pub fn order(&self, id: ContainerId) -> Option<&Order> {
        self.container(id).map(Container::order)
    }

    /// Item with `id` anywhere on the board.
    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        find_in(&self.main, id)
    }

    /// Container directly holding `id`.
    #[must_use]
    pub fn locate(&self, id: ItemId) -> Option<ContainerId> {
        locate_in(&self.main, ContainerId::Main, id)
    }

    /// Level of a container; the main grid is 1.
    #[must_use]
    pub fn container_depth(&self, id: ContainerId) -> Option<usize> {
        match id {
            ContainerId::Main => Some(1),
            ContainerId::Folder(folder) => {
                self.find(folder)?.children()?;
                let parent = self.locate(folder)?;
                Some(self.container_depth(parent)? + 1)
            }
        }
    }

    /// Fresh id: one past the largest id on the board.
    ///
    /// Fails once the largest id is `u64::MAX`.
    pub fn next_item_id(&self) -> Result<ItemId, StoreError> {
        let mut max = 0u64;
        for item in self.main.items().values() {
            item.walk(&mut |entry| max = max.max(entry.id.0));
        }
        max.checked_add(1)
            .map(ItemId)
            .ok_or(StoreError::IdSpaceExhausted(ItemId(max)))
    }

    /// First `n` children of `folder` in folder order.
    pub fn folder_preview(&self, folder: ItemId, n: usize) -> Result<Vec<&Item>, StoreError> {
        let item = self.find(folder).ok_or(StoreError::UnknownItem(folder))?;
        let children = item.children().ok_or(StoreError::NotAFolder(folder))?;
        Ok(children.iter_ordered().take(n).collect())
    }

    /// Check every container's order and board-wide id uniqueness.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.main
            .validate(ContainerId::Main)
            .map_err(|(container, violation)| StoreError::InvalidOrderState {
                container,
                violation,
            })?;
        let mut seen = BTreeSet::new();
        let mut duplicate = None;
        for item in self.main.items().values() {
            item.walk(&mut |entry| {
                if !seen.insert(entry.id) && duplicate.is_none() {
                    duplicate = Some(entry.id);
                }
            });
        }
        match duplicate {
            Some(id) => Err(StoreError::DuplicateItem(id)),
            None => Ok(()),
        }
    }

    /// What `policy` would do if `guest` were dropped on `host` in
    /// `container`. Used both for live hover feedback and at commit.
    pub fn merge_decision(
        &self,
        container: ContainerId,
        host: ItemId,
        guest: ItemId,
        policy: &dyn FolderMergePolicy,
    ) -> Result<MergeDecision, StoreError> {
        if host == guest {
            return Err(StoreError::SelfMerge(host));
        }
        let target = self
            .container(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        let host_item = target.get(host).ok_or(StoreError::UnknownItem(host))?;
        let guest_item = target.get(guest).ok_or(StoreError::UnknownItem(guest))?;
        let container_depth = self
            .container_depth(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        Ok(policy.evaluate(&MergeRequest {
            container,
            container_depth,
            host: host_item,
            guest: guest_item,
        }))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Move `id` to `index` inside its container (splice semantics).
    pub fn move_within(
        &mut self,
        container: ContainerId,
        id: ItemId,
        index: usize,
    ) -> Result<usize, StoreError> {
        let target = self
            .container_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        target
            .move_within(id, index)
            .ok_or(StoreError::UnknownItem(id))
    }

    /// Replace a container's order with a permutation of the same ids.
    pub fn replace_order(&mut self, container: ContainerId, order: Order) -> Result<(), StoreError> {
        let target = self
            .container_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        if order.len() != target.len() {
            return Err(StoreError::InvalidOrderState {
                container,
                violation: OrderViolation::LengthMismatch {
                    order: order.len(),
                    items: target.len(),
                },
            });
        }
        let ids: BTreeSet<ItemId> = target.items().keys().copied().collect();
        order
            .validate_against(&ids)
            .map_err(|violation| StoreError::InvalidOrderState {
                container,
                violation,
            })?;
        target.set_order(order);
        Ok(())
    }

    /// Remove `id` (and, for a folder, its whole subtree) from `container`.
    pub fn delete_item(&mut self, container: ContainerId, id: ItemId) -> Result<Item, StoreError> {
        let target = self
            .container_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        target
            .remove(id)
            .map(|(_, item)| item)
            .ok_or(StoreError::UnknownItem(id))
    }

    /// Insert `item` at `index` (clamped) in `container`. Returns the final
    /// position.
    pub fn insert_at(
        &mut self,
        container: ContainerId,
        index: usize,
        item: Item,
    ) -> Result<usize, StoreError> {
        let mut clash = None;
        item.walk(&mut |entry| {
            if clash.is_none() && self.find(entry.id).is_some() {
                clash = Some(entry.id);
            }
        });
        if let Some(id) = clash {
            return Err(StoreError::DuplicateItem(id));
        }
        let target = self
            .container_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        Ok(target.insert_at(index, item))
    }

    /// Insert `item` at the front of `container`.
    pub fn add_to_front(&mut self, container: ContainerId, item: Item) -> Result<(), StoreError> {
        self.insert_at(container, 0, item).map(|_| ())
    }

    /// Prepend an empty folder called `name`. Returns its fresh id.
    pub fn create_folder(
        &mut self,
        container: ContainerId,
        name: impl Into<String>,
    ) -> Result<ItemId, StoreError> {
        let id = self.next_item_id()?;
        self.add_to_front(container, Item::folder(id, name, Vec::new()))?;
        Ok(id)
    }

    pub fn rename(&mut self, id: ItemId, name: impl Into<String>) -> Result<(), StoreError> {
        let parent = self.locate(id).ok_or(StoreError::UnknownItem(id))?;
        let item = self
            .container_mut(parent)
            .and_then(|container| container.get_mut(id))
            .ok_or(StoreError::UnknownItem(id))?;
        item.name = name.into();
        Ok(())
    }

    /// Move `id` out of `from` and onto the front of `to` in one step.
    pub fn transfer_to_front(
        &mut self,
        from: ContainerId,
        id: ItemId,
        to: ContainerId,
    ) -> Result<(), StoreError> {
        let source = self
            .container(from)
            .ok_or(StoreError::UnknownContainer(from))?;
        let item = source.get(id).ok_or(StoreError::UnknownItem(id))?;
        match to {
            ContainerId::Main => {}
            ContainerId::Folder(folder) => {
                if item.contains_id(folder) {
                    return Err(StoreError::UnknownContainer(to));
                }
                if self.container(to).is_none() {
                    return Err(StoreError::UnknownContainer(to));
                }
            }
        }
        let (_, item) = self
            .container_mut(from)
            .and_then(|container| container.remove(id))
            .ok_or(StoreError::UnknownItem(id))?;
        let target = self
            .container_mut(to)
            .ok_or(StoreError::UnknownContainer(to))?;
        target.insert_at(0, item);
        Ok(())
    }

    /// Drop `guest` onto `host`, both in `container`, as `policy` decides.
    ///
    /// The guest leaves `container` and lands at the end of the host's
    /// folder in the same step.
    pub fn merge_into_folder(
        &mut self,
        container: ContainerId,
        host: ItemId,
        guest: ItemId,
        policy: &dyn FolderMergePolicy,
    ) -> Result<MergeOutcome, StoreError> {
        let decision = self.merge_decision(container, host, guest, policy)?;
        let folder_name = match decision {
            MergeDecision::Reject(reason) => {
                return Err(StoreError::MergeRejected {
                    host,
                    guest,
                    reason,
                });
            }
            MergeDecision::Append => None,
            MergeDecision::Promote { folder_name } => Some(folder_name),
        };
        let host_is_folder = self
            .container(container)
            .and_then(|target| target.get(host))
            .is_some_and(Item::is_folder);
        if folder_name.is_none() && !host_is_folder {
            return Err(StoreError::NotAFolder(host));
        }

        let target = self
            .container_mut(container)
            .ok_or(StoreError::UnknownContainer(container))?;
        let (_, guest_item) = target.remove(guest).ok_or(StoreError::UnknownItem(guest))?;
        let host_item = target.get_mut(host).ok_or(StoreError::UnknownItem(host))?;
        let outcome = match host_item.folder.as_mut() {
            Some(nested) => {
                nested.push(guest_item);
                MergeOutcome::Appended
            }
            None => {
                host_item.folder = Some(Container::from_items(vec![guest_item]));
                if let Some(name) = folder_name {
                    host_item.name = name;
                }
                MergeOutcome::Promoted
            }
        };
        Ok(outcome)
    }
}

fn find_in(container: &Container, id: ItemId) -> Option<&Item> {
    if let Some(item) = container.get(id) {
        return Some(item);
    }
    container
        .items()
        .values()
        .filter_map(Item::children)
        .find_map(|nested| find_in(nested, id))
}

fn locate_in(container: &Container, here: ContainerId, id: ItemId) -> Option<ContainerId> {
    if container.contains(id) {
        return Some(here);
    }
    container.items().values().find_map(|item| {
        item.children()
            .and_then(|nested| locate_in(nested, ContainerId::Folder(item.id), id))
    })
}
