//! # Blockwise Editor
//!
//! Core document model and command surface for a block-based rich editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: block type → plugin descriptor    │
//! │  - define_element / create_element          │
//! │  - extend_editor hooks, event handlers      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: commands + queries                  │
//! │  - validate → mutate → reindex → emit       │
//! │  - selection and focus state                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: id → block map + order index      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ event bus: `change` with the full value     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Orders are derived**: top-level `meta.order` is always exactly `0..N`
//! 2. **Whole-value notification**: subscribers see the document, never a diff
//! 3. **Plugins own behavior**: the editor core knows no block type by name
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockwise_editor::{Block, Editor, EditorEvent, InsertOptions, PluginRegistry};
//!
//! let mut editor = Editor::new(registry);
//! editor.on(EditorEvent::Change, |value| println!("{} blocks", value.len()));
//!
//! let id = editor.insert_block(Block::new("paragraph"), InsertOptions::append())?;
//! editor.move_block(&id, 0)?;
//! ```

mod block;
mod commands;
mod config;
mod document;
mod editor;
mod errors;
mod event_bus;
mod extension;
mod focus;
mod input;
mod order_index;
mod registry;
mod selection;

pub use block::{
    build_block_data, generate_id, Block, BlockChildren, BlockData, BlockId, BlockMeta,
    BLOCK_ID_ATTRIBUTE,
};
pub use commands::{CommandError, DeleteOptions, InsertOptions, PlusAction, SelectOptions};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{Document, DocumentValue};
pub use editor::Editor;
pub use errors::EditorError;
pub use event_bus::{ChangeHandler, EditorEvent, EventBus, SubscriptionId};
pub use extension::{EditorMethods, ExtendEditor, IsVoidFn, NormalizeBlockFn};
pub use focus::{CursorPlacement, DetachedFocus, FocusHandler};
pub use input::{
    BlockFactory, EventContext, EventHandler, Hotkeys, InputEvent, Modifiers, Propagation,
    ON_KEY_DOWN, ON_PASTE,
};
pub use order_index::OrderIndex;
pub use registry::{
    CreateElement, DefineElement, PluginDescriptor, PluginRegistry, RegistryError, Renderer,
};
pub use selection::Selection;
