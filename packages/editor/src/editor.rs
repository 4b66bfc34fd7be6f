//! # Editor API
//!
//! The public command and query surface of one editor instance.
//!
//! Every mutating command runs to completion on the calling turn:
//!
//! ```text
//! validate → mutate store → reindex orders → emit `change`
//! ```
//!
//! Validation failures are returned to the caller before anything is touched,
//! and no `change` is emitted for them.

use std::sync::Arc;

use tracing::{debug, info};

use crate::block::{build_block_data, generate_id, Block, BlockId};
use crate::commands::{CommandError, DeleteOptions, InsertOptions, PlusAction, SelectOptions};
use crate::config::EditorConfig;
use crate::document::{Document, DocumentValue};
use crate::errors::EditorError;
use crate::event_bus::{EditorEvent, EventBus, SubscriptionId};
use crate::extension::EditorMethods;
use crate::focus::{CursorPlacement, DetachedFocus, FocusHandler};
use crate::input::{EventContext, InputEvent, Propagation};
use crate::registry::{PluginDescriptor, PluginRegistry};
use crate::selection::Selection;

pub struct Editor {
    id: String,
    config: EditorConfig,
    document: Document,
    registry: Arc<PluginRegistry>,
    methods: EditorMethods,
    selection: Selection,
    focused: Option<BlockId>,
    events: EventBus,
    focus: Box<dyn FocusHandler>,
}

impl Editor {
    pub fn new(registry: impl Into<Arc<PluginRegistry>>) -> Self {
        Self::with_config(registry, EditorConfig::default())
    }

    /// Create an editor; every plugin's `extend_editor` hook is applied here
    pub fn with_config(registry: impl Into<Arc<PluginRegistry>>, config: EditorConfig) -> Self {
        let registry = registry.into();
        let methods = registry.extend(EditorMethods::default());
        let id = config.id.clone().unwrap_or_else(generate_id);

        info!(editor_id = %id, plugins = registry.len(), read_only = config.read_only, "Creating editor");

        Self {
            id,
            config,
            document: Document::new(),
            registry,
            methods,
            selection: Selection::default(),
            focused: None,
            events: EventBus::new(),
            focus: Box::new(DetachedFocus),
        }
    }

    /// Attach the text engine's focus capability
    pub fn with_focus_handler(mut self, handler: impl FocusHandler + 'static) -> Self {
        self.focus = Box::new(handler);
        self
    }

    pub fn with_value(mut self, value: DocumentValue) -> Result<Self, EditorError> {
        self.load_value(value)?;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn methods(&self) -> &EditorMethods {
        &self.methods
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn focused_block_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn block_count(&self) -> usize {
        self.document.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.document.contains(id)
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.document.get(id)
    }

    pub fn block_at(&self, order: usize) -> Option<&Block> {
        self.document.block_at(order)
    }

    pub fn order_of(&self, id: &str) -> Option<usize> {
        self.document.order_of(id)
    }

    pub fn blocks_in_order(&self) -> impl Iterator<Item = &Block> + '_ {
        self.document.blocks_in_order()
    }

    /// Full document value, as emitted on `change`
    pub fn snapshot(&self) -> DocumentValue {
        self.document.snapshot()
    }

    /// Whether the block is void under the extended method set
    pub fn is_void(&self, id: &str) -> bool {
        self.document
            .get(id)
            .is_some_and(|block| self.methods.is_void(block))
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.document.snapshot())?)
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let value: DocumentValue = serde_json::from_str(json)?;
        self.load_value(value)
    }

    /// Replace the whole document with an imported value.
    ///
    /// Every block type must be registered. Orders are repaired to `0..N`.
    pub fn load_value(&mut self, value: DocumentValue) -> Result<(), EditorError> {
        if let Some(unknown) = value
            .values()
            .find(|block| !self.registry.contains(&block.block_type))
        {
            return Err(CommandError::UnknownBlockType(unknown.block_type.clone()).into());
        }

        let document = Document::from_value(value)?;
        info!(editor_id = %self.id, blocks = document.len(), "Loading document");

        self.document.replace(document);
        self.selection.clear();
        self.focused = None;
        self.emit_change();

        if self.config.auto_focus {
            if let Some(first) = self.document.resolve(0).map(str::to_owned) {
                self.focus_block(&first)?;
            }
        }
        Ok(())
    }

    /// Subscribe to editor events
    pub fn on<F>(&mut self, event: EditorEvent, handler: F) -> SubscriptionId
    where
        F: FnMut(&DocumentValue) + 'static,
    {
        self.events.on(event, Box::new(handler))
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    /// Insert `block` at `options.at` (default: after the last block)
    pub fn insert_block(
        &mut self,
        block: Block,
        options: InsertOptions,
    ) -> Result<BlockId, CommandError> {
        self.ensure_writable()?;

        let len = self.document.len();
        let at = options.at.unwrap_or(len);
        if at > len {
            return Err(CommandError::InvalidPath { at, len });
        }
        if self.document.contains(&block.id) {
            return Err(CommandError::DuplicateBlockId(block.id));
        }
        if !self.registry.contains(&block.block_type) {
            return Err(CommandError::UnknownBlockType(block.block_type));
        }

        let id = block.id.clone();
        let mut block = block;
        self.methods.normalize_block(&mut block);
        block.id = id.clone();

        self.document.insert(block, at)?;
        debug!(editor_id = %self.id, block_id = %id, at, "Inserted block");
        self.emit_change();

        if options.focus {
            self.selection.set_path(Some(at));
            self.request_focus(&id, CursorPlacement::Start);
        }

        Ok(id)
    }

    /// Delete the blocks at each path.
    ///
    /// Paths are resolved independently against the current document. A path
    /// that resolves to nothing is skipped; if none resolve, nothing is
    /// mutated or emitted. Returns the ids that were deleted.
    pub fn delete_block(&mut self, options: DeleteOptions) -> Result<Vec<BlockId>, CommandError> {
        self.ensure_writable()?;

        let mut ids: Vec<BlockId> = Vec::new();
        for path in options.from_paths {
            match self.document.resolve(path) {
                Some(id) if !ids.iter().any(|seen| seen == id) => ids.push(id.to_string()),
                Some(_) => {}
                None => debug!(editor_id = %self.id, path, "Skipping stale delete path"),
            }
        }

        if ids.is_empty() {
            return Ok(ids);
        }

        self.document.remove(&ids);
        self.selection.forget(&ids);
        if self.focused.as_ref().is_some_and(|f| ids.contains(f)) {
            self.focused = None;
        }

        debug!(editor_id = %self.id, deleted = ids.len(), "Deleted blocks");
        self.emit_change();
        Ok(ids)
    }

    /// Move a block to order `to`; only its `meta.order` changes
    pub fn move_block(&mut self, id: &str, to: usize) -> Result<(), CommandError> {
        self.ensure_writable()?;
        self.document.move_block(id, to)?;
        debug!(editor_id = %self.id, block_id = %id, to, "Moved block");
        self.emit_change();
        Ok(())
    }

    /// Edit a block's data or children in place
    pub fn update_block<F>(&mut self, id: &str, edit: F) -> Result<(), CommandError>
    where
        F: FnOnce(&mut Block),
    {
        self.ensure_writable()?;
        self.document.update_block(id, edit)?;
        self.emit_change();
        Ok(())
    }

    /// Convert a block into `block_type` through that plugin's `create_element`
    pub fn create_element(&mut self, id: &str, block_type: &str) -> Result<(), CommandError> {
        self.ensure_writable()?;

        let plugin = self
            .registry
            .get(block_type)
            .ok_or_else(|| CommandError::UnknownBlockType(block_type.to_string()))?;
        let current = self
            .document
            .get(id)
            .ok_or_else(|| CommandError::BlockNotFound(id.to_string()))?;

        let mut next = plugin.convert(current);
        self.methods.normalize_block(&mut next);
        next.id = current.id.clone();
        next.meta.order = current.meta.order;

        self.document.update_block(id, move |block| *block = next)?;
        debug!(editor_id = %self.id, block_id = %id, block_type, "Converted block");
        self.emit_change();
        Ok(())
    }

    /// Collapse the selection onto `path`, or clear it with `None`
    pub fn set_selection(&mut self, path: Option<usize>) {
        self.selection.set_path(path);
    }

    /// Mark the block at `path` selected
    pub fn set_block_selected(
        &mut self,
        path: usize,
        options: SelectOptions,
    ) -> Result<(), CommandError> {
        let id = self
            .document
            .resolve(path)
            .ok_or(CommandError::PathNotFound(path))?
            .to_string();
        self.selection.select(id, options.only);
        Ok(())
    }

    /// Give input focus to a block.
    ///
    /// Blocks whose renderer takes over input are focused through their custom
    /// editor; all others through the text engine with the cursor at the start.
    pub fn focus_block(&mut self, id: &str) -> Result<(), CommandError> {
        let order = self
            .document
            .order_of(id)
            .ok_or_else(|| CommandError::BlockNotFound(id.to_string()))?;

        self.request_focus(id, CursorPlacement::Start);
        self.selection.set_path(Some(order));
        Ok(())
    }

    /// Focus a block and make it the only selected block
    pub fn select_block(&mut self, id: &str) -> Result<(), CommandError> {
        self.focus_block(id)?;
        let order = self
            .document
            .order_of(id)
            .ok_or_else(|| CommandError::BlockNotFound(id.to_string()))?;
        self.set_block_selected(order, SelectOptions::only())?;
        self.set_selection(Some(order));
        Ok(())
    }

    pub fn blur(&mut self) {
        self.selection.clear();
        self.focused = None;
        self.focus.blur();
    }

    /// The "plus" block action.
    ///
    /// On an empty, non-void text block with an insertion menu available the
    /// menu is opened in place. Otherwise a default block is inserted after
    /// `id` and focused.
    pub fn insert_block_after(&mut self, id: &str) -> Result<PlusAction, CommandError> {
        self.ensure_writable()?;

        let block = self
            .document
            .get(id)
            .ok_or_else(|| CommandError::BlockNotFound(id.to_string()))?;
        let order = block.meta.order;

        let has_custom_editor = self
            .registry
            .get(&block.block_type)
            .is_some_and(PluginDescriptor::has_custom_editor);
        let is_empty = !has_custom_editor && block.is_empty_text();

        if self.config.action_menu && is_empty && !self.methods.is_void(block) {
            self.set_selection(Some(order));
            self.focus_block(id)?;
            return Ok(PlusAction::OpenActionMenu {
                anchor: id.to_string(),
            });
        }

        let default_block = self.default_block();
        self.set_selection(Some(order));
        let new_id = self.insert_block(default_block, InsertOptions::at(order + 1).focus())?;

        Ok(PlusAction::Inserted {
            id: new_id,
            reopen_menu: self.config.action_menu,
        })
    }

    /// Route an input event to the focused block's plugin handler.
    ///
    /// Without a focused block or a matching handler the event falls through
    /// to the text engine (`Propagation::Continue`).
    pub fn dispatch_event(
        &mut self,
        event_name: &str,
        event: &InputEvent,
    ) -> Result<Propagation, CommandError> {
        let Some(block_type) = self.focused_block().map(|b| b.block_type.clone()) else {
            return Ok(Propagation::Continue);
        };
        let Some(handler) = self.registry.handler(&block_type, event_name) else {
            return Ok(Propagation::Continue);
        };

        debug!(editor_id = %self.id, block_type = %block_type, event = event_name, "Dispatching input event");
        let ctx = self.event_context();
        handler(self, &ctx, event)
    }

    /// Context bag handed to plugin event handlers
    pub fn event_context(&self) -> EventContext {
        let registry = self.registry.clone();
        let default_type = self.config.default_block_type.clone();
        EventContext::new(Arc::new(move || {
            registry
                .define_element(&default_type)
                .unwrap_or_else(|| build_block_data(default_type.as_str()))
        }))
    }

    /// Fresh block of the configured default type
    pub fn default_block(&self) -> Block {
        self.registry
            .define_element(&self.config.default_block_type)
            .unwrap_or_else(|| build_block_data(self.config.default_block_type.as_str()))
    }

    /// Focused block, falling back to the selection's focus path
    pub fn focused_block(&self) -> Option<&Block> {
        self.focused
            .as_deref()
            .and_then(|id| self.document.get(id))
            .or_else(|| {
                self.selection
                    .focus_path
                    .and_then(|path| self.document.block_at(path))
            })
    }

    fn request_focus(&mut self, id: &str, placement: CursorPlacement) {
        let Some(block) = self.document.get(id) else {
            return;
        };
        let custom = self
            .registry
            .get(&block.block_type)
            .is_some_and(PluginDescriptor::has_custom_editor);

        if custom {
            self.focus.focus_custom_editor(block);
        } else {
            self.focus.focus_text(block, placement);
        }
        self.focused = Some(id.to_string());
    }

    fn ensure_writable(&self) -> Result<(), CommandError> {
        if self.config.read_only {
            debug!(editor_id = %self.id, "Rejecting command on read-only editor");
            return Err(CommandError::ReadOnly);
        }
        Ok(())
    }

    fn emit_change(&mut self) {
        let snapshot = self.document.snapshot();
        self.events.emit(EditorEvent::Change, &snapshot);
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("id", &self.id)
            .field("blocks", &self.document.len())
            .field("selection", &self.selection)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}
