//! Per-instance selection state.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;

/// Transient selection, reset on blur
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor_path: Option<usize>,
    pub focus_path: Option<usize>,
    pub selected_block_ids: Vec<BlockId>,
}

impl Selection {
    /// Collapse anchor and focus onto `path`
    pub fn set_path(&mut self, path: Option<usize>) {
        self.anchor_path = path;
        self.focus_path = path;
    }

    /// Mark a block selected; `only` drops the prior block selection
    pub fn select(&mut self, id: BlockId, only: bool) {
        if only {
            self.selected_block_ids.clear();
        }
        if !self.selected_block_ids.contains(&id) {
            self.selected_block_ids.push(id);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_block_ids.iter().any(|s| s == id)
    }

    /// Drop ids of blocks that no longer exist
    pub fn forget(&mut self, ids: &[BlockId]) {
        self.selected_block_ids.retain(|id| !ids.contains(id));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
