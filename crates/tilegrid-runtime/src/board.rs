#![forbid(unsafe_code)]

//! Board coordinator: the main grid plus at most one open folder.
//!
//! Both views share one [`SharedStore`], so a commit in either is visible to
//! the other on its next frame. Dragging a tile out of the open folder moves
//! it to the front of the main grid in the same store step and closes the
//! folder view.

use std::sync::Arc;

use tilegrid_core::{EngineConfig, PointerEvent};
use tilegrid_layout::GridGeometry;
use tilegrid_store::{
    BoardSnapshot, ContainerId, FolderMergePolicy, Item, ItemId, NestingLimitPolicy, OrderStore,
    SharedStore, StoreError,
};
use web_time::Instant;

use crate::controller::{ExitPolicy, GridController};
use crate::event::GridEvent;

/// Where an opened folder is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FolderLayout {
    pub geometry: GridGeometry,
    /// Height of the folder container; drives outside detection.
    pub container_height: f32,
}

#[derive(Debug)]
pub struct Board {
    store: Arc<SharedStore>,
    config: EngineConfig,
    policy: Arc<dyn FolderMergePolicy>,
    main: GridController,
    folder: Option<GridController>,
    folder_layout: FolderLayout,
}

impl Board {
    pub fn new(
        board: OrderStore,
        main_geometry: GridGeometry,
        folder_layout: FolderLayout,
        config: EngineConfig,
    ) -> Result<Self, StoreError> {
        let store = Arc::new(SharedStore::new(board)?);
        let policy: Arc<dyn FolderMergePolicy> = Arc::new(NestingLimitPolicy::from_config(&config));
        let main = GridController::new(
            ContainerId::Main,
            Arc::clone(&store),
            main_geometry,
            config.clone(),
        )
        .with_policy(Arc::clone(&policy));
        Ok(Self {
            store,
            config,
            policy,
            main,
            folder: None,
            folder_layout,
        })
    }

    /// Swap the merge policy for both views. An open folder keeps its old
    /// policy until reopened.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn FolderMergePolicy>) -> Self {
        self.policy = Arc::clone(&policy);
        self.main = self.rebuild_main(policy);
        self
    }

    fn rebuild_main(&self, policy: Arc<dyn FolderMergePolicy>) -> GridController {
        GridController::new(
            ContainerId::Main,
            Arc::clone(&self.store),
            *self.main.geometry(),
            self.config.clone(),
        )
        .with_policy(policy)
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<SharedStore> {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.store.load()
    }

    #[inline]
    #[must_use]
    pub fn main(&self) -> &GridController {
        &self.main
    }

    #[inline]
    pub fn main_mut(&mut self) -> &mut GridController {
        &mut self.main
    }

    #[inline]
    #[must_use]
    pub fn folder(&self) -> Option<&GridController> {
        self.folder.as_ref()
    }

    #[inline]
    pub fn folder_mut(&mut self) -> Option<&mut GridController> {
        self.folder.as_mut()
    }

    #[must_use]
    pub fn open_folder_id(&self) -> Option<ItemId> {
        match self.folder.as_ref()?.container() {
            ContainerId::Folder(id) => Some(id),
            ContainerId::Main => None,
        }
    }

    pub fn set_folder_layout(&mut self, layout: FolderLayout) {
        self.folder_layout = layout;
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Feed a pointer sample that landed on the main grid.
    pub fn process_main(&mut self, event: &PointerEvent) -> Vec<GridEvent> {
        let events = self.main.process(event);
        self.follow_main(events)
    }

    /// Feed a pointer sample that landed in the open folder. Ignored when no
    /// folder is open.
    pub fn process_folder(&mut self, event: &PointerEvent) -> Vec<GridEvent> {
        let events = match self.folder.as_mut() {
            Some(folder) => folder.process(event),
            None => return Vec::new(),
        };
        self.follow_folder(events)
    }

    /// Per-frame hold check for both views.
    pub fn tick(&mut self, now: Instant) -> Vec<GridEvent> {
        let events = self.main.tick(now);
        let mut out = self.follow_main(events);
        if let Some(folder) = self.folder.as_mut() {
            let events = folder.tick(now);
            out.extend(self.follow_folder(events));
        }
        out
    }

    fn follow_main(&mut self, events: Vec<GridEvent>) -> Vec<GridEvent> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            let opened = match &event {
                GridEvent::FolderOpened { folder } => Some(folder.id),
                _ => None,
            };
            out.push(event);
            if let Some(id) = opened {
                match self.open_folder(id) {
                    Ok(closed) => out.extend(closed),
                    Err(error) => {
                        tracing::warn!(
                            target: "tilegrid.controller",
                            folder = id.get(),
                            %error,
                            "folder vanished before it could open"
                        );
                    }
                }
            }
        }
        out
    }

    fn follow_folder(&mut self, events: Vec<GridEvent>) -> Vec<GridEvent> {
        let exited = events
            .iter()
            .any(|event| matches!(event, GridEvent::ItemRemoved { .. }));
        let mut out = events;
        if exited {
            out.extend(self.close_folder());
        }
        out
    }

    // ------------------------------------------------------------------
    // Folder view
    // ------------------------------------------------------------------

    /// Open the folder view over `id`, closing any other open folder first.
    /// Returns the events produced by that close.
    pub fn open_folder(&mut self, id: ItemId) -> Result<Vec<GridEvent>, StoreError> {
        let snapshot = self.store.load();
        let item = snapshot.find(id).ok_or(StoreError::UnknownItem(id))?;
        if !item.is_folder() {
            return Err(StoreError::NotAFolder(id));
        }
        if self.open_folder_id() == Some(id) {
            return Ok(Vec::new());
        }
        let closed = self.close_folder();
        let controller = GridController::new(
            ContainerId::Folder(id),
            Arc::clone(&self.store),
            self.folder_layout.geometry,
            self.config.clone(),
        )
        .with_policy(Arc::clone(&self.policy))
        .with_outside_bounds(self.folder_layout.container_height)
        .with_exit(ExitPolicy::TransferToFront(ContainerId::Main));
        self.folder = Some(controller);
        tracing::debug!(target: "tilegrid.controller", folder = id.get(), "folder view opened");
        Ok(closed)
    }

    /// Close the folder view, cancelling any gesture still running in it.
    pub fn close_folder(&mut self) -> Vec<GridEvent> {
        let Some(mut folder) = self.folder.take() else {
            return Vec::new();
        };
        let mut out = folder.force_cancel();
        if let ContainerId::Folder(id) = folder.container() {
            tracing::debug!(target: "tilegrid.controller", folder = id.get(), "folder view closed");
            out.push(GridEvent::FolderClosed { folder: id });
        }
        out
    }

    // ------------------------------------------------------------------
    // Caller actions
    // ------------------------------------------------------------------

    /// Prepend a new tile called `name` to the main grid.
    pub fn add_item(&self, name: impl Into<String>) -> Result<ItemId, StoreError> {
        let name = name.into();
        self.store.update(|board| {
            let id = board.next_item_id()?;
            board.add_to_front(ContainerId::Main, Item::tile(id, name))?;
            Ok(id)
        })
    }

    /// Prepend an empty folder with the configured default name.
    pub fn create_folder(&self) -> Result<ItemId, StoreError> {
        let name = self.config.default_folder_name.clone();
        self.store
            .update(|board| board.create_folder(ContainerId::Main, name))
    }

    /// Delete `id` wherever it lives. Deleting the open folder (or the folder
    /// holding it) closes the folder view.
    pub fn delete_item(&mut self, id: ItemId) -> Result<Vec<GridEvent>, StoreError> {
        let (container, item) = self.store.update(|board| {
            let container = board.locate(id).ok_or(StoreError::UnknownItem(id))?;
            let item = board.delete_item(container, id)?;
            Ok((container, item))
        })?;
        let mut out = Vec::new();
        let folder_gone = self
            .open_folder_id()
            .is_some_and(|open| item.contains_id(open));
        out.push(GridEvent::ItemRemoved { container, item });
        if folder_gone {
            out.extend(self.close_folder());
        }
        Ok(out)
    }

    pub fn rename(&self, id: ItemId, name: impl Into<String>) -> Result<(), StoreError> {
        let name = name.into();
        self.store.update(|board| board.rename(id, name))
    }
}
