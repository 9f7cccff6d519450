#![forbid(unsafe_code)]

//! Folder merge policy.
//!
//! When a dragged tile is released over another tile, the store asks a
//! [`FolderMergePolicy`] what to do. A plain host is promoted to a folder; a
//! folder host receives the guest at the end of its order. The policy may
//! also refuse, which the drag layer uses to suppress the hover target while
//! the gesture is still live.

use std::fmt;

use serde::{Deserialize, Serialize};
use tilegrid_core::EngineConfig;
use tilegrid_core::config::DEFAULT_FOLDER_NAME;

use crate::item::{ContainerId, Item};

/// Inputs to a merge decision.
#[derive(Debug, Clone, Copy)]
pub struct MergeRequest<'a> {
    /// Container holding both host and guest.
    pub container: ContainerId,
    /// Level of that container; the main grid is level 1.
    pub container_depth: usize,
    pub host: &'a Item,
    pub guest: &'a Item,
}

impl MergeRequest<'_> {
    /// Deepest container level the board would have under this merge.
    #[must_use]
    pub fn resulting_depth(&self) -> usize {
        self.container_depth + 1 + self.guest.nested_levels()
    }
}

/// What a merge should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeDecision {
    /// Turn the plain host into a folder named `folder_name` holding the guest.
    Promote { folder_name: String },
    /// Append the guest to the host folder.
    Append,
    Reject(MergeRejection),
}

impl MergeDecision {
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Reject(_))
    }
}

/// Why a policy refused a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeRejection {
    NestingTooDeep { resulting_depth: usize, max_depth: usize },
    Declined { reason: String },
}

impl fmt::Display for MergeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestingTooDeep {
                resulting_depth,
                max_depth,
            } => write!(
                f,
                "nesting depth {resulting_depth} exceeds limit {max_depth}"
            ),
            Self::Declined { reason } => f.write_str(reason),
        }
    }
}

/// Decides whether and how a hover target absorbs a dragged item.
///
/// Policies must be pure: the drag layer evaluates them every frame while a
/// tile hovers, and once more at release.
pub trait FolderMergePolicy: Send + Sync + fmt::Debug {
    fn evaluate(&self, request: &MergeRequest<'_>) -> MergeDecision;
}

/// Default policy: promote or append while the board stays within
/// `max_depth` container levels.
///
/// With the default limit of two, merges happen only in the main grid and
/// only with a plain tile as guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingLimitPolicy {
    pub max_depth: usize,
    pub folder_name: String,
}

impl NestingLimitPolicy {
    #[must_use]
    pub fn new(max_depth: usize, folder_name: impl Into<String>) -> Self {
        Self {
            max_depth,
            folder_name: folder_name.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_nesting_depth, config.default_folder_name.clone())
    }
}

impl Default for NestingLimitPolicy {
    fn default() -> Self {
        Self::new(2, DEFAULT_FOLDER_NAME)
    }
}

impl FolderMergePolicy for NestingLimitPolicy {
    fn evaluate(&self, request: &MergeRequest<'_>) -> MergeDecision {
        let resulting_depth = request.resulting_depth();
        if resulting_depth > self.max_depth {
            return MergeDecision::Reject(MergeRejection::NestingTooDeep {
                resulting_depth,
                max_depth: self.max_depth,
            });
        }
        if request.host.is_folder() {
            MergeDecision::Append
        } else {
            MergeDecision::Promote {
                folder_name: self.folder_name.clone(),
            }
        }
    }
}
