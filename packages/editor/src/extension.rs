//! # Editor Method Set
//!
//! Behavior that plugins may patch through `extend_editor`.
//!
//! Each hook receives the current method set and returns a patched one. A hook
//! that overrides a method captures the previous implementation and calls
//! through to it for blocks it does not own, so hooks compose in registration
//! order:
//!
//! ```rust,ignore
//! PluginDescriptor::new("video", define_video).extend_editor(|methods| {
//!     methods.wrap_is_void(|block, previous| block.block_type == "video" || previous(block))
//! })
//! ```

use std::fmt;
use std::sync::Arc;

use crate::block::Block;

pub type IsVoidFn = Arc<dyn Fn(&Block) -> bool + Send + Sync>;
pub type NormalizeBlockFn = Arc<dyn Fn(&mut Block) + Send + Sync>;

/// Hook applied once at editor initialization
pub type ExtendEditor = Arc<dyn Fn(EditorMethods) -> EditorMethods + Send + Sync>;

#[derive(Clone)]
pub struct EditorMethods {
    /// Whether a block has no editable text content
    pub is_void: IsVoidFn,

    /// Applied to every block before it is inserted
    pub normalize_block: NormalizeBlockFn,
}

impl EditorMethods {
    pub fn is_void(&self, block: &Block) -> bool {
        (self.is_void)(block)
    }

    pub fn normalize_block(&self, block: &mut Block) {
        (self.normalize_block)(block)
    }

    /// Override `is_void`, keeping the previous implementation reachable
    pub fn wrap_is_void<F>(mut self, patch: F) -> Self
    where
        F: Fn(&Block, &IsVoidFn) -> bool + Send + Sync + 'static,
    {
        let previous = self.is_void.clone();
        self.is_void = Arc::new(move |block| patch(block, &previous));
        self
    }

    /// Override `normalize_block`, keeping the previous implementation reachable
    pub fn wrap_normalize_block<F>(mut self, patch: F) -> Self
    where
        F: Fn(&mut Block, &NormalizeBlockFn) + Send + Sync + 'static,
    {
        let previous = self.normalize_block.clone();
        self.normalize_block = Arc::new(move |block| patch(block, &previous));
        self
    }
}

impl Default for EditorMethods {
    fn default() -> Self {
        Self {
            is_void: Arc::new(|_| false),
            normalize_block: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for EditorMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorMethods").finish_non_exhaustive()
    }
}
