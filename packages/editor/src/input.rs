//! Input events routed to per-type plugin handlers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::commands::CommandError;
use crate::editor::Editor;

pub const ON_KEY_DOWN: &str = "onKeyDown";
pub const ON_PASTE: &str = "onPaste";

/// Handler for one input event on blocks of one type.
///
/// Returns `Propagation::Stop` to suppress the text engine's default handling.
pub type EventHandler = Arc<
    dyn Fn(&mut Editor, &EventContext, &InputEvent) -> Result<Propagation, CommandError>
        + Send
        + Sync,
>;

pub type BlockFactory = Arc<dyn Fn() -> Block + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }
}

/// Whether the text engine should still run its default handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Hotkey predicates handed to event handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct Hotkeys;

impl Hotkeys {
    fn bare(event: &InputEvent, key: &str) -> bool {
        let m = event.modifiers;
        event.key == key && !m.shift && !m.ctrl && !m.alt && !m.meta
    }

    pub fn is_enter(&self, event: &InputEvent) -> bool {
        Self::bare(event, "Enter")
    }

    pub fn is_shift_enter(&self, event: &InputEvent) -> bool {
        event.key == "Enter" && event.modifiers.shift
    }

    pub fn is_backspace(&self, event: &InputEvent) -> bool {
        Self::bare(event, "Backspace")
    }

    pub fn is_delete(&self, event: &InputEvent) -> bool {
        Self::bare(event, "Delete")
    }

    pub fn is_tab(&self, event: &InputEvent) -> bool {
        Self::bare(event, "Tab")
    }

    pub fn is_shift_tab(&self, event: &InputEvent) -> bool {
        event.key == "Tab" && event.modifiers.shift
    }

    pub fn is_escape(&self, event: &InputEvent) -> bool {
        event.key == "Escape"
    }

    pub fn is_slash(&self, event: &InputEvent) -> bool {
        Self::bare(event, "/")
    }

    pub fn is_select_all(&self, event: &InputEvent) -> bool {
        event.key.eq_ignore_ascii_case("a") && (event.modifiers.ctrl || event.modifiers.meta)
    }
}

/// Context bag passed to event handlers
#[derive(Clone)]
pub struct EventContext {
    default_block: BlockFactory,
    pub hotkeys: Hotkeys,
}

impl EventContext {
    pub fn new(default_block: BlockFactory) -> Self {
        Self {
            default_block,
            hotkeys: Hotkeys,
        }
    }

    /// A fresh block of the editor's default type
    pub fn default_block(&self) -> Block {
        (self.default_block)()
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("hotkeys", &self.hotkeys)
            .finish_non_exhaustive()
    }
}
