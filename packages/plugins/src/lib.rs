//! # Blockwise Plugins
//!
//! Stock block types for the editor.
//!
//! | Type | Shortcut | Notes |
//! |---|---|---|
//! | `paragraph` | | default block type |
//! | `code` | `` ``` `` | `language` defaults on insert |
//! | `video` | | void, custom editor, Enter inserts a paragraph after |
//! | `bulleted-list` | `-` | composite, seeded with one `list-item` |
//!
//! ```rust,ignore
//! let registry = blockwise_plugins::core_registry()?;
//! let editor = blockwise_editor::Editor::new(registry);
//! ```

mod code;
mod lists;
mod paragraph;
mod video;

use blockwise_editor::{PluginDescriptor, PluginRegistry, RegistryError};

pub use code::{code, CODE, DEFAULT_LANGUAGE};
pub use lists::{bulleted_list, list_item, BULLETED_LIST, LIST_ITEM, SKIP_DRAG};
pub use paragraph::{paragraph, PARAGRAPH};
pub use video::{video, DEFAULT_VIDEO_SIZE, VIDEO};

/// Every stock plugin, in registration order
pub fn core_plugins() -> Vec<PluginDescriptor> {
    vec![paragraph(), code(), video(), bulleted_list()]
}

pub fn core_registry() -> Result<PluginRegistry, RegistryError> {
    PluginRegistry::with_plugins(core_plugins())
}
