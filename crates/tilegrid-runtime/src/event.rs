#![forbid(unsafe_code)]

//! Events a controller hands back to its host, and an observer interface for
//! hosts that prefer callbacks.
//!
//! Live drag feedback (tile position, hover target, outside flag) is not
//! evented: hosts poll it every frame from the controller. Events cover the
//! discrete moments only.

use tilegrid_store::{ContainerId, Item, ItemId, Order, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Long press accepted; hosts typically play haptic feedback.
    HoldStarted { id: ItemId },
    /// Ambient scrolling must be disabled (`true`) or restored (`false`).
    ScrollLock(bool),
    EditingChanged(bool),
    OrderChanged { container: ContainerId, order: Order },
    ItemsChanged { container: ContainerId, items: Vec<Item> },
    /// A tile was dragged out of `container` and released.
    ItemRemoved { container: ContainerId, item: Item },
    /// A tap landed on a folder tile.
    FolderOpened { folder: Item },
    FolderClosed { folder: ItemId },
    /// The release could not be committed; the board is unchanged.
    CommitFailed { id: ItemId, error: StoreError },
}

impl GridEvent {
    /// Forward this event to the matching observer hook.
    pub fn dispatch(&self, observer: &mut dyn GridObserver) {
        match self {
            Self::HoldStarted { id } => observer.on_hold_started(*id),
            Self::ScrollLock(locked) => observer.on_scroll_lock(*locked),
            Self::EditingChanged(editing) => observer.on_editing_changed(*editing),
            Self::OrderChanged { container, order } => observer.on_order_changed(*container, order),
            Self::ItemsChanged { container, items } => observer.on_items_changed(*container, items),
            Self::ItemRemoved { container, item } => observer.on_item_removed(*container, item),
            Self::FolderOpened { folder } => observer.on_folder_opened(folder),
            Self::FolderClosed { folder } => observer.on_folder_closed(*folder),
            Self::CommitFailed { id, error } => observer.on_commit_failed(*id, error),
        }
    }
}

/// Callback-style consumer of [`GridEvent`]s. Every hook defaults to a no-op.
#[allow(unused_variables)]
pub trait GridObserver {
    fn on_hold_started(&mut self, id: ItemId) {}
    fn on_scroll_lock(&mut self, locked: bool) {}
    fn on_editing_changed(&mut self, editing: bool) {}
    fn on_order_changed(&mut self, container: ContainerId, order: &Order) {}
    fn on_items_changed(&mut self, container: ContainerId, items: &[Item]) {}
    fn on_item_removed(&mut self, container: ContainerId, item: &Item) {}
    fn on_folder_opened(&mut self, folder: &Item) {}
    fn on_folder_closed(&mut self, folder: ItemId) {}
    fn on_commit_failed(&mut self, id: ItemId, error: &StoreError) {}
}

/// Dispatch a batch in order.
pub fn dispatch_all<'a>(
    events: impl IntoIterator<Item = &'a GridEvent>,
    observer: &mut dyn GridObserver,
) {
    for event in events {
        event.dispatch(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        orders: Vec<Vec<u64>>,
        removed: Vec<ItemId>,
        scroll: Vec<bool>,
    }

    impl GridObserver for Recorder {
        fn on_order_changed(&mut self, _container: ContainerId, order: &Order) {
            self.orders.push(order.iter().map(ItemId::get).collect());
        }

        fn on_item_removed(&mut self, _container: ContainerId, item: &Item) {
            self.removed.push(item.id);
        }

        fn on_scroll_lock(&mut self, locked: bool) {
            self.scroll.push(locked);
        }
    }

    #[test]
    fn dispatch_routes_to_hooks_in_order() {
        let events = vec![
            GridEvent::ScrollLock(true),
            GridEvent::HoldStarted { id: ItemId(1) },
            GridEvent::OrderChanged {
                container: ContainerId::Main,
                order: Order::from(vec![ItemId(2), ItemId(1)]),
            },
            GridEvent::ItemRemoved {
                container: ContainerId::Folder(ItemId(5)),
                item: Item::tile(7, "x"),
            },
            GridEvent::ScrollLock(false),
        ];
        let mut recorder = Recorder::default();
        dispatch_all(&events, &mut recorder);
        assert_eq!(recorder.orders, vec![vec![2, 1]]);
        assert_eq!(recorder.removed, vec![ItemId(7)]);
        assert_eq!(recorder.scroll, vec![true, false]);
    }
}
