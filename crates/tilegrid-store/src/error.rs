#![forbid(unsafe_code)]

//! Store error taxonomy.

use crate::item::{ContainerId, ItemId};
use crate::merge::MergeRejection;

/// Ways an order can fail to be a permutation of its container's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrderViolation {
    #[error("id {0} appears more than once")]
    DuplicateId(ItemId),

    #[error("id {0} has no backing item")]
    DanglingId(ItemId),

    #[error("item {0} is missing from the order")]
    MissingId(ItemId),

    #[error("order has {order} entries but the container holds {items} items")]
    LengthMismatch { order: usize, items: usize },
}

/// Errors returned by store mutations. A failed mutation leaves the store
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid order state in {container}: {violation}")]
    InvalidOrderState {
        container: ContainerId,
        violation: OrderViolation,
    },

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("unknown container {0}")]
    UnknownContainer(ContainerId),

    #[error("item {0} is not a folder")]
    NotAFolder(ItemId),

    #[error("item {0} cannot be merged into itself")]
    SelfMerge(ItemId),

    #[error("item {0} already exists on the board")]
    DuplicateItem(ItemId),

    #[error("no fresh item id left above {0}")]
    IdSpaceExhausted(ItemId),

    #[error("merge of {guest} into {host} rejected: {reason}")]
    MergeRejected {
        host: ItemId,
        guest: ItemId,
        reason: MergeRejection,
    },
}

impl StoreError {
    /// Whether this error reports a broken order/item invariant.
    #[must_use]
    pub fn is_invalid_order_state(&self) -> bool {
        matches!(self, Self::InvalidOrderState { .. })
    }
}
