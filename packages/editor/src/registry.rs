//! # Plugin Registry
//!
//! Block behavior is described by plain capability records
//! ([`PluginDescriptor`]) and dispatched by looking up the block's `type`.
//! There is no shared base block type.
//!
//! A descriptor may declare:
//! - `define_element`: default block factory (required)
//! - `renderer`: whether the type takes over input with a custom editor
//! - `extend_editor`: patch of the editor method set, see [`crate::extension`]
//! - `events`: input-event handlers scoped to the type
//! - `child_plugin`: nested type for composite blocks
//! - `create_element`: conversion of an existing block into this type
//! - `shortcut`: typed trigger resolving to this type

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::block::{Block, BlockChildren};
use crate::commands::CommandError;
use crate::editor::Editor;
use crate::extension::{EditorMethods, ExtendEditor};
use crate::input::{EventContext, EventHandler, InputEvent, Propagation};

pub type DefineElement = Arc<dyn Fn() -> Block + Send + Sync>;
pub type CreateElement = Arc<dyn Fn(&PluginDescriptor, &Block) -> Block + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Block type already registered: {0}")]
    DuplicateType(String),

    #[error("Shortcut {shortcut:?} already bound to {existing}")]
    DuplicateShortcut { shortcut: String, existing: String },
}

/// Render hook declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Renderer {
    /// Rendered around the text engine's content
    #[default]
    Element,

    /// Takes over input with its own editor; focus goes to that editor
    CustomEditor,
}

/// Capability record for one block type
#[derive(Clone)]
pub struct PluginDescriptor {
    block_type: String,
    shortcut: Option<String>,
    define_element: DefineElement,
    renderer: Renderer,
    extend_editor: Option<ExtendEditor>,
    events: HashMap<String, EventHandler>,
    child_plugin: Option<Arc<PluginDescriptor>>,
    create_element: Option<CreateElement>,
}

impl PluginDescriptor {
    pub fn new<F>(block_type: impl Into<String>, define_element: F) -> Self
    where
        F: Fn() -> Block + Send + Sync + 'static,
    {
        Self {
            block_type: block_type.into(),
            shortcut: None,
            define_element: Arc::new(define_element),
            renderer: Renderer::Element,
            extend_editor: None,
            events: HashMap::new(),
            child_plugin: None,
            create_element: None,
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn extend_editor<F>(mut self, hook: F) -> Self
    where
        F: Fn(EditorMethods) -> EditorMethods + Send + Sync + 'static,
    {
        self.extend_editor = Some(Arc::new(hook));
        self
    }

    /// Register a handler for `event` on blocks of this type
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Editor, &EventContext, &InputEvent) -> Result<Propagation, CommandError>
            + Send
            + Sync
            + 'static,
    {
        self.events.insert(event.into(), Arc::new(handler));
        self
    }

    pub fn child_plugin(mut self, child: PluginDescriptor) -> Self {
        self.child_plugin = Some(Arc::new(child));
        self
    }

    pub fn create_element<F>(mut self, create: F) -> Self
    where
        F: Fn(&PluginDescriptor, &Block) -> Block + Send + Sync + 'static,
    {
        self.create_element = Some(Arc::new(create));
        self
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn get_shortcut(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    pub fn get_renderer(&self) -> Renderer {
        self.renderer
    }

    pub fn has_custom_editor(&self) -> bool {
        self.renderer == Renderer::CustomEditor
    }

    pub fn get_child_plugin(&self) -> Option<&PluginDescriptor> {
        self.child_plugin.as_deref()
    }

    pub fn handler(&self, event: &str) -> Option<EventHandler> {
        self.events.get(event).cloned()
    }

    /// Fresh default block of this type.
    ///
    /// Composite types are never built empty: if the factory leaves no child
    /// blocks, one is seeded from the child plugin's own `define_element`,
    /// recursively.
    pub fn define_element(&self) -> Block {
        let block = (self.define_element)();
        let depth = block.meta.depth;
        self.seed_children(block, depth)
    }

    /// Like `define_element`, with the whole seeded subtree placed at `depth`
    fn define_element_at(&self, depth: usize) -> Block {
        self.seed_children((self.define_element)(), depth)
    }

    fn seed_children(&self, mut block: Block, depth: usize) -> Block {
        block.block_type = self.block_type.clone();
        block.meta.depth = depth;

        if let Some(child) = &self.child_plugin {
            let has_children = block.child_blocks().is_some_and(|c| !c.is_empty());
            if !has_children {
                let seed = child.define_element_at(depth + 1);
                block.children = BlockChildren::Blocks(vec![seed]);
            }
            block.children.recompact();
        }

        block
    }

    /// Convert `from` into this type, keeping its id and ordering metadata
    pub fn convert(&self, from: &Block) -> Block {
        let mut block = match &self.create_element {
            Some(create) => create(self, from),
            None => self.define_element(),
        };
        block.id = from.id.clone();
        block.block_type = self.block_type.clone();
        block.meta.order = from.meta.order;
        block.meta.depth = from.meta.depth;
        block
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<&String> = self.events.keys().collect();
        events.sort();
        f.debug_struct("PluginDescriptor")
            .field("type", &self.block_type)
            .field("shortcut", &self.shortcut)
            .field("renderer", &self.renderer)
            .field("extends_editor", &self.extend_editor.is_some())
            .field("events", &events)
            .field(
                "child_plugin",
                &self.child_plugin.as_ref().map(|c| c.block_type.as_str()),
            )
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<PluginDescriptor>>,

    /// Types in registration order
    types: Vec<String>,

    /// shortcut -> type
    shortcuts: HashMap<String, String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, stopping at the first collision
    pub fn with_plugins(
        plugins: impl IntoIterator<Item = PluginDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for plugin in plugins {
            registry.register(plugin)?;
        }
        Ok(registry)
    }

    /// Register a descriptor; the registry is unchanged on error
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Result<(), RegistryError> {
        if self.plugins.contains_key(&descriptor.block_type) {
            return Err(RegistryError::DuplicateType(descriptor.block_type));
        }
        if let Some(shortcut) = &descriptor.shortcut {
            if let Some(existing) = self.shortcuts.get(shortcut) {
                return Err(RegistryError::DuplicateShortcut {
                    shortcut: shortcut.clone(),
                    existing: existing.clone(),
                });
            }
        }

        debug!(
            block_type = %descriptor.block_type,
            shortcut = ?descriptor.shortcut,
            events = descriptor.events.len(),
            "Registering plugin"
        );

        if let Some(shortcut) = &descriptor.shortcut {
            self.shortcuts
                .insert(shortcut.clone(), descriptor.block_type.clone());
        }
        self.types.push(descriptor.block_type.clone());
        self.plugins
            .insert(descriptor.block_type.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, block_type: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(block_type).map(Arc::as_ref)
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.plugins.contains_key(block_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types in registration order
    pub fn types(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.iter().map(String::as_str)
    }

    pub fn find_by_shortcut(&self, shortcut: &str) -> Option<&PluginDescriptor> {
        self.shortcuts
            .get(shortcut)
            .and_then(|block_type| self.get(block_type))
    }

    pub fn define_element(&self, block_type: &str) -> Option<Block> {
        self.get(block_type).map(PluginDescriptor::define_element)
    }

    pub fn handler(&self, block_type: &str, event: &str) -> Option<EventHandler> {
        self.get(block_type).and_then(|plugin| plugin.handler(event))
    }

    /// Fold every `extend_editor` hook over `base`, in registration order
    pub fn extend(&self, base: EditorMethods) -> EditorMethods {
        self.types
            .iter()
            .filter_map(|block_type| self.plugins.get(block_type))
            .filter_map(|plugin| plugin.extend_editor.clone())
            .fold(base, |methods, hook| hook(methods))
    }
}
