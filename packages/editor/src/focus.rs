//! Focus capability supplied by the text engine host.

use crate::block::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPlacement {
    Start,
    End,
}

/// Receives focus requests for blocks.
///
/// The editor calls `focus_text` for blocks edited by the text engine and
/// `focus_custom_editor` for types whose renderer takes over input.
pub trait FocusHandler {
    fn focus_text(&mut self, block: &Block, placement: CursorPlacement);

    fn focus_custom_editor(&mut self, block: &Block);

    fn blur(&mut self) {}
}

/// Used when no text engine is attached
#[derive(Debug, Default)]
pub struct DetachedFocus;

impl FocusHandler for DetachedFocus {
    fn focus_text(&mut self, _block: &Block, _placement: CursorPlacement) {}

    fn focus_custom_editor(&mut self, _block: &Block) {}
}
