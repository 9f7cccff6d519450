#![forbid(unsafe_code)]

//! Items and identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::container::Container;

/// Stable identifier of a tile or folder, unique across the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Addresses one grid: the main grid or the nested grid of a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerId {
    Main,
    Folder(ItemId),
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Folder(id) => write!(f, "folder {id}"),
        }
    }
}

/// A tile on the board. Folders carry their own nested container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<Container>,
}

impl Item {
    /// A plain tile.
    #[must_use]
    pub fn tile(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder: None,
        }
    }

    /// A folder whose order follows `children` as given.
    #[must_use]
    pub fn folder(id: impl Into<ItemId>, name: impl Into<String>, children: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder: Some(Container::from_items(children)),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Nested container, if this is a folder.
    #[inline]
    #[must_use]
    pub fn children(&self) -> Option<&Container> {
        self.folder.as_ref()
    }

    /// Container levels this item brings along: 0 for a tile, 1 for a folder
    /// of tiles, and so on.
    #[must_use]
    pub fn nested_levels(&self) -> usize {
        match &self.folder {
            None => 0,
            Some(container) => {
                1 + container
                    .items()
                    .values()
                    .map(Item::nested_levels)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// This item and every descendant, depth-first.
    pub fn walk(&self, visit: &mut impl FnMut(&Item)) {
        visit(self);
        if let Some(container) = &self.folder {
            for child in container.items().values() {
                child.walk(visit);
            }
        }
    }

    /// Whether `id` is this item or one of its descendants.
    #[must_use]
    pub fn contains_id(&self, id: ItemId) -> bool {
        self.id == id
            || self
                .folder
                .as_ref()
                .is_some_and(|container| container.items().values().any(|c| c.contains_id(id)))
    }
}
