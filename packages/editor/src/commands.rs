//! # Commands
//!
//! Options and errors for the editor's command surface.
//!
//! ## Command Semantics
//!
//! Every command is validate → mutate → reindex → notify. A command that
//! fails validation leaves the document untouched and emits nothing.
//!
//! ### Insert
//! - Fails on a path past the end of the document
//! - Shifts every block at or after the insertion point by one
//!
//! ### Delete
//! - Each path is resolved independently against the document before deletion
//! - A path that resolves to nothing is skipped silently (stale paths from
//!   asynchronous callers are expected)
//!
//! ### Move
//! - Same block value is relocated, subtree included
//! - Fails if the id is unknown

use thiserror::Error;

use crate::block::BlockId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Invalid path: {at} (document has {len} blocks)")]
    InvalidPath { at: usize, len: usize },

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("No block at path: {0}")]
    PathNotFound(usize),

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),

    #[error("Block keyed {key:?} carries id {id:?}")]
    KeyMismatch { key: BlockId, id: BlockId },

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Cannot change {0} of an existing block")]
    ImmutableField(&'static str),

    #[error("Editor is read-only")]
    ReadOnly,
}

impl CommandError {
    /// Malformed input: bad path, duplicate id, unregistered type, ...
    pub fn is_validation(&self) -> bool {
        !self.is_not_found()
    }

    /// The addressed id or path does not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommandError::BlockNotFound(_) | CommandError::PathNotFound(_)
        )
    }
}

/// Options for `Editor::insert_block`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Target order; `None` appends
    pub at: Option<usize>,

    /// Move selection to the new block and place the cursor at its start
    pub focus: bool,
}

impl InsertOptions {
    pub fn at(order: usize) -> Self {
        Self {
            at: Some(order),
            focus: false,
        }
    }

    pub fn append() -> Self {
        Self::default()
    }

    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }
}

/// Options for `Editor::delete_block`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub from_paths: Vec<usize>,
}

impl DeleteOptions {
    pub fn paths(paths: impl IntoIterator<Item = usize>) -> Self {
        Self {
            from_paths: paths.into_iter().collect(),
        }
    }
}

/// Options for `Editor::set_block_selected`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Clear prior block selection first
    pub only: bool,
}

impl SelectOptions {
    pub fn only() -> Self {
        Self { only: true }
    }
}

/// What the "plus" block action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlusAction {
    /// The block is empty text: the UI should open its insertion menu on it
    OpenActionMenu { anchor: BlockId },

    /// A default block was inserted after the anchor and focused.
    ///
    /// `reopen_menu` asks the UI to open the insertion menu on the new block
    /// on its next tick, once layout has settled.
    Inserted { id: BlockId, reopen_menu: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(CommandError::BlockNotFound("x".into()).is_not_found());
        assert!(CommandError::PathNotFound(3).is_not_found());
        assert!(CommandError::InvalidPath { at: 5, len: 2 }.is_validation());
        assert!(CommandError::DuplicateBlockId("x".into()).is_validation());
        assert!(!CommandError::ReadOnly.is_not_found());
    }

    #[test]
    fn test_insert_options_builders() {
        let options = InsertOptions::at(2).focus();
        assert_eq!(options.at, Some(2));
        assert!(options.focus);
        assert_eq!(InsertOptions::append().at, None);
    }

    #[test]
    fn test_error_messages() {
        let err = CommandError::InvalidPath { at: 4, len: 1 };
        assert_eq!(err.to_string(), "Invalid path: 4 (document has 1 blocks)");
    }
}
